use std::time::Duration;

use gloo_timers::future::TimeoutFuture;

use gateway_ui_app::ports::Timer;

/// `setTimeout` based sleeps; dropping one clears its timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    type Sleep = TimeoutFuture;

    fn sleep(&self, duration: Duration) -> TimeoutFuture {
        TimeoutFuture::new(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX))
    }
}
