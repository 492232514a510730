use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::Job;

/// Shared slot mutated by callers and by the window timer task.
#[derive(Default)]
struct ThrottleSlot {
    /// Whether a window opened by the last fired job is still running
    throttled: bool,
    /// The single replacement kept while throttled (most recent wins)
    queued: Option<Job>,
    /// Timer that closes the current window
    window_timer: Option<JoinHandle<()>>,
    /// The job fired most recently, still running or finished
    in_flight: Option<JoinHandle<()>>,
    /// Bumped by `cancel`; work captured under an older epoch is dropped
    epoch: u64,
    /// Set by `close`; nothing fires afterwards
    closed: bool,
}

fn lock(slot: &Mutex<ThrottleSlot>) -> MutexGuard<'_, ThrottleSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fires a job immediately, then suppresses re-entry for `window`.
///
/// Jobs arriving while the window is open are not queued as a list: only the
/// latest one is retained, and it is fired (opening a new window) once the
/// current window closes. Firing a job aborts the previously fired job if it
/// is still running, so at most one job is ever in flight.
#[derive(Clone)]
pub struct Throttler {
    window: Duration,
    slot: Arc<Mutex<ThrottleSlot>>,
}

impl std::fmt::Debug for Throttler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = lock(&self.slot);
        f.debug_struct("Throttler")
            .field("window", &self.window)
            .field("throttled", &slot.throttled)
            .field("queued", &slot.queued.is_some())
            .field("closed", &slot.closed)
            .finish()
    }
}

impl Throttler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Arc::new(Mutex::new(ThrottleSlot::default())),
        }
    }

    /// Current cancellation epoch. Work captured before a later `cancel`
    /// carries a stale epoch and is dropped by [`Throttler::dispatch`].
    pub(crate) fn epoch(&self) -> u64 {
        lock(&self.slot).epoch
    }

    pub(crate) fn dispatch(&self, job: Job, epoch: u64) {
        dispatch(self.window, &self.slot, job, epoch);
    }

    pub fn is_throttled(&self) -> bool {
        lock(&self.slot).throttled
    }

    pub fn has_queued(&self) -> bool {
        lock(&self.slot).queued.is_some()
    }

    /// Whether the most recently fired job is still running.
    pub fn is_in_flight(&self) -> bool {
        lock(&self.slot)
            .in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Drop the queued job, close the window and abort the running job.
    /// The throttler stays usable.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.epoch = slot.epoch.wrapping_add(1);
        slot.throttled = false;
        slot.queued = None;
        if let Some(timer) = slot.window_timer.take() {
            timer.abort();
        }
        if let Some(job) = slot.in_flight.take() {
            job.abort();
        }
    }

    /// Cancel everything and refuse further jobs.
    pub fn close(&self) {
        self.cancel();
        lock(&self.slot).closed = true;
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.slot).closed
    }
}

fn dispatch(window: Duration, slot: &Arc<Mutex<ThrottleSlot>>, job: Job, epoch: u64) {
    let mut state = lock(slot);
    if state.closed || state.epoch != epoch {
        tracing::trace!("throttler cancelled; dropping job");
        return;
    }
    if state.throttled {
        if state.queued.replace(job).is_some() {
            tracing::trace!("throttle window open; superseded queued job dropped");
        }
        return;
    }

    state.throttled = true;
    if let Some(previous) = state.in_flight.replace(tokio::spawn(job())) {
        previous.abort();
    }
    let weak = Arc::downgrade(slot);
    state.window_timer = Some(tokio::spawn(close_window(window, weak, epoch)));
}

async fn close_window(window: Duration, slot: Weak<Mutex<ThrottleSlot>>, epoch: u64) {
    sleep(window).await;
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let next = {
        let mut state = lock(&slot);
        if state.epoch != epoch {
            return;
        }
        state.throttled = false;
        state.window_timer = None;
        state.queued.take()
    };
    if let Some(job) = next {
        dispatch(window, &slot, job, epoch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex as StdMutex;

    use futures_util::future::BoxFuture;

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn job<F, Fut>(task: F) -> Job
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Box::new(move || -> BoxFuture<'static, ()> { Box::pin(task()) })
    }

    fn record(log: &Arc<StdMutex<Vec<u32>>>, value: u32) -> Job {
        let log = Arc::clone(log);
        Box::new(move || -> BoxFuture<'static, ()> {
            Box::pin(async move {
                log.lock().expect("log lock").push(value);
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn first_job_fires_immediately_and_opens_a_window() {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let throttler = Throttler::new(Duration::from_millis(750));

        throttler.dispatch(record(&log, 1), throttler.epoch());
        settle().await;

        assert_eq!(*log.lock().expect("log lock"), vec![1]);
        assert!(throttler.is_throttled());
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_job_in_a_window_fires_after_it_closes() {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let throttler = Throttler::new(Duration::from_millis(750));

        throttler.dispatch(record(&log, 1), throttler.epoch());
        settle().await;
        throttler.dispatch(record(&log, 2), throttler.epoch());
        throttler.dispatch(record(&log, 3), throttler.epoch());
        assert!(throttler.has_queued());

        sleep(Duration::from_millis(800)).await;
        settle().await;

        assert_eq!(*log.lock().expect("log lock"), vec![1, 3]);
        assert!(throttler.is_throttled(), "firing the queued job opens a new window");

        sleep(Duration::from_millis(800)).await;
        settle().await;
        assert!(!throttler.is_throttled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_queued_job() {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let throttler = Throttler::new(Duration::from_millis(750));

        throttler.dispatch(record(&log, 1), throttler.epoch());
        settle().await;
        throttler.dispatch(record(&log, 2), throttler.epoch());
        throttler.cancel();

        sleep(Duration::from_millis(2000)).await;
        settle().await;
        assert_eq!(*log.lock().expect("log lock"), vec![1]);
        assert!(!throttler.is_throttled());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_epoch_and_closed_throttler_never_fire() {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let throttler = Throttler::new(Duration::from_millis(100));

        let stale = throttler.epoch();
        throttler.cancel();
        throttler.dispatch(record(&log, 1), stale);

        throttler.close();
        throttler.dispatch(job(|| async {}), throttler.epoch());
        throttler.dispatch(record(&log, 2), throttler.epoch());
        settle().await;

        assert!(log.lock().expect("log lock").is_empty());
        assert!(throttler.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_a_running_job() {
        let finished = Arc::new(StdMutex::new(false));
        let throttler = Throttler::new(Duration::from_millis(100));

        let flag = Arc::clone(&finished);
        let slow = job(move || async move {
            sleep(Duration::from_secs(5)).await;
            *flag.lock().expect("flag lock") = true;
        });
        throttler.dispatch(slow, throttler.epoch());
        settle().await;
        assert!(throttler.is_in_flight());

        throttler.cancel();
        sleep(Duration::from_secs(10)).await;
        settle().await;
        assert!(!*finished.lock().expect("flag lock"));
    }
}
