//! Rate limiting for expensive asynchronous callbacks.
//!
//! A [`RateLimiter`] stacks two single-slot stages:
//!
//! 1. a [`Debouncer`] that collapses a burst of calls into the last one,
//!    fired after a quiet period, and
//! 2. a [`Throttler`] that lets a fired call through immediately but holds
//!    back anything arriving while the previous call's window is still open,
//!    keeping only the most recent arrival.
//!
//! Neither stage ever queues more than one call. Superseded calls are dropped
//! and their futures resolve to `None`, so callers can tell "replaced" apart
//! from "ran".

mod debounce;
mod throttle;

use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

pub use debounce::Debouncer;
pub use throttle::Throttler;

/// Boxed unit of work handed from the debouncer to the throttler.
pub(crate) type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Default delay applied to both stages.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(750);

/// Timing for the two stages of a [`RateLimiter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Quiet period required after the last call before it fires
    pub debounce: Duration,
    /// Minimum spacing between two fired calls
    pub throttle: Duration,
}

impl RateLimiterConfig {
    /// Use the same delay for both stages.
    pub fn uniform(delay: Duration) -> Self {
        Self {
            debounce: delay,
            throttle: delay,
        }
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_RATE_LIMIT_DELAY)
    }
}

/// Debounce + throttle gate for one asynchronous callback stream.
///
/// The limiter owns every timer it starts. [`RateLimiter::cancel`] aborts
/// them, [`RateLimiter::shutdown`] additionally refuses later calls, and
/// dropping the limiter shuts it down, so no callback can fire once its
/// owner is gone.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    debouncer: Debouncer,
    throttler: Throttler,
    closed: bool,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(config.debounce),
            throttler: Throttler::new(config.throttle),
            closed: false,
        }
    }

    pub fn config(&self) -> RateLimiterConfig {
        self.config
    }

    /// Schedule `callback`, superseding any call that has not fired yet.
    ///
    /// The returned future resolves to the callback's output once it has
    /// run, or to `None` if the call was superseded, cancelled, or scheduled
    /// after shutdown. Dropping the future does not cancel the call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut, T>(&mut self, callback: F) -> impl Future<Output = Option<T>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        if self.closed {
            tracing::trace!("rate limiter shut down; call dropped");
        } else {
            let job: Job = Box::new(move || -> BoxFuture<'static, ()> {
                Box::pin(async move {
                    let output = callback().await;
                    let _ = sender.send(output);
                })
            });
            let throttler = self.throttler.clone();
            let epoch = throttler.epoch();
            self.debouncer.debounce(move || throttler.dispatch(job, epoch));
        }
        async move { receiver.await.ok() }
    }

    /// Whether a call is waiting on either stage or still running.
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_pending() || self.throttler.has_queued() || self.throttler.is_in_flight()
    }

    /// Abort pending, queued and running calls. The limiter stays usable.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
        self.throttler.cancel();
    }

    /// Abort everything and refuse later calls.
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.debouncer.cancel();
        self.throttler.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
