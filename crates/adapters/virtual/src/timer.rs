//! Manual clock: sleeps complete only when the test advances time.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;

use gateway_ui_app::ports::Timer;

#[derive(Debug, Default)]
struct Clock {
    now: Duration,
    sleepers: Vec<(Duration, oneshot::Sender<()>)>,
}

#[derive(Debug, Clone, Default)]
pub struct VirtualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl VirtualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the timer was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Move the clock forward and wake every sleep that is now due.
    ///
    /// Woken tasks only run once their executor is driven again.
    pub fn advance(&self, by: Duration) {
        let due = {
            let mut clock = self.clock.borrow_mut();
            clock.now += by;
            let now = clock.now;
            let (due, pending) = std::mem::take(&mut clock.sleepers)
                .into_iter()
                .partition::<Vec<_>, _>(|(deadline, _)| *deadline <= now);
            clock.sleepers = pending;
            due
        };
        tracing::trace!(?by, woken = due.len(), "advance");
        for (_, sender) in due {
            // the sleep may have been dropped meanwhile
            let _ = sender.send(());
        }
    }

    /// Sleeps still waiting, dropped ones left out.
    #[must_use]
    pub fn sleepers(&self) -> usize {
        let mut clock = self.clock.borrow_mut();
        clock.sleepers.retain(|(_, sender)| !sender.is_canceled());
        clock.sleepers.len()
    }
}

/// Completes when the clock passes its deadline.
#[derive(Debug)]
pub struct VirtualSleep {
    wake: Option<oneshot::Receiver<()>>,
}

impl Future for VirtualSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().wake {
            None => Poll::Ready(()),
            Some(wake) => wake.poll_unpin(cx).map(|_| ()),
        }
    }
}

impl Timer for VirtualTimer {
    type Sleep = VirtualSleep;

    fn sleep(&self, duration: Duration) -> VirtualSleep {
        if duration.is_zero() {
            return VirtualSleep { wake: None };
        }
        let (sender, receiver) = oneshot::channel();
        let mut clock = self.clock.borrow_mut();
        let deadline = clock.now + duration;
        clock.sleepers.push((deadline, sender));
        VirtualSleep {
            wake: Some(receiver),
        }
    }
}
