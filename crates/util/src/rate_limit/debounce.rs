use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Single-slot debouncer: only the most recent call survives a quiet period.
///
/// Each call to [`Debouncer::debounce`] aborts the timer of the previous
/// call (if it has not fired yet) and starts a fresh one, so a burst of calls
/// fires exactly once, `delay` after the last call.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    /// The one live timer task, if any
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Run `fire` once `delay` has elapsed without another call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn debounce<F>(&mut self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            tracing::trace!("debounce restarted; superseded call dropped");
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            fire();
        }));
    }

    /// Abort the pending timer. Returns `true` when an unfired call was
    /// dropped.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
