//! Timer port: delays on the event loop.

use std::future::Future;
use std::time::Duration;

/// Source of sleep futures.
///
/// The sleep future is `'static` so polling loops can own it while their
/// page goes on with other work.
pub trait Timer {
    type Sleep: Future<Output = ()> + 'static;

    fn sleep(&self, duration: Duration) -> Self::Sleep;
}
