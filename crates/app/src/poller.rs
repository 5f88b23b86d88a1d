//! Cancellable periodic refresh.
//!
//! A poll loop runs its body, then waits a fixed interval after each
//! completed attempt, whether it succeeded or not. The loop stops when its
//! [`PollHandle`] is cancelled or dropped; pages cancel on `leave` so no
//! refresh touches a detached view.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};

use gateway_ui_view::Node;

use crate::ports::Timer;

/// Starts poll loops with a shared timer and interval.
#[derive(Debug, Clone)]
pub struct Poller<K> {
    timer: K,
    interval: Duration,
}

impl<K: Timer + Clone + 'static> Poller<K> {
    pub fn new(timer: K, interval: Duration) -> Self {
        Self { timer, interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn `body` on the event loop owning `node`: run it now, then again
    /// `interval` after each run completes.
    pub fn start<N, F, Fut>(&self, node: &N, mut body: F) -> PollHandle
    where
        N: Node,
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let timer = self.timer.clone();
        let interval = self.interval;
        let task = async move {
            loop {
                body().await;
                timer.sleep(interval).await;
            }
        };
        node.spawn_local(Box::pin(async move {
            if Abortable::new(task, registration).await.is_err() {
                tracing::debug!("poll loop cancelled");
            }
        }));
        PollHandle { abort }
    }
}

/// Stops its poll loop when cancelled or dropped.
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Set while the user edits an input; refreshes skip while it is set.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn set(&self, busy: bool) {
        self.0.set(busy);
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.get()
    }
}
