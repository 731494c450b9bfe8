//! Slow-operation watchdog.
//!
//! Wraps a future with a recurring warning that repeats while the future is
//! still pending. The wrapped future is never cancelled, timed out or altered;
//! the watchdog only observes it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kiln_config::DEFAULT_WATCHDOG_INTERVAL_MS;
use parking_lot::Mutex;

use crate::scheduler::{Scheduler, TimerHandle, TokioScheduler};
use crate::sink::{LogSink, TracingSink};

/// Emits a warning every `interval` while a guarded operation is pending.
#[derive(Clone)]
pub struct Watchdog {
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn LogSink>,
    interval: Duration,
}

impl Watchdog {
    pub fn new(scheduler: Arc<dyn Scheduler>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            scheduler,
            sink,
            interval: Duration::from_millis(DEFAULT_WATCHDOG_INTERVAL_MS),
        }
    }

    /// Default interval between repeated warnings.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Guard `operation` using the watchdog's default interval.
    pub fn guard<F>(&self, operation: F, message: impl Into<String>) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        self.guard_every(operation, self.interval, message)
    }

    /// Guard `operation`, warning with `message` every `interval` until it settles.
    ///
    /// The timer starts when this is called, not when the returned future is
    /// first polled. It is cancelled exactly once, when the operation settles
    /// or the returned future is dropped. The operation's output is returned
    /// unchanged. No warning is emitted once the operation has settled, even
    /// when a timer thread was already mid-tick.
    pub fn guard_every<F>(
        &self,
        operation: F,
        interval: Duration,
        message: impl Into<String>,
    ) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        let message: Arc<str> = Arc::from(message.into());
        let sink = self.sink.clone();
        let line = message.clone();
        let settled = Arc::new(Mutex::new(false));
        let gate = settled.clone();
        let timer = self.scheduler.every(
            interval,
            interval,
            Box::new(move || {
                let settled = gate.lock();
                if !*settled {
                    sink.warn(&line);
                }
            }),
        );
        let guard = Release { timer, settled };

        async move {
            let output = operation.await;
            if guard.settle() {
                tracing::trace!(warnings = guard.timer.ticks(), "watchdog released: {}", message);
            }
            output
        }
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(Arc::new(TokioScheduler), Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchdog")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Closes the warning gate and cancels the timer, on settle or on drop.
struct Release {
    timer: TimerHandle,
    settled: Arc<Mutex<bool>>,
}

impl Release {
    /// Returns `true` only for the call that cancelled the timer.
    fn settle(&self) -> bool {
        *self.settled.lock() = true;
        self.timer.cancel()
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        self.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ManualScheduler, Tick};
    use crate::sink::MemorySink;
    use futures::FutureExt;
    use tokio::sync::oneshot;

    fn watchdog() -> (Arc<ManualScheduler>, MemorySink, Watchdog) {
        let scheduler = Arc::new(ManualScheduler::new());
        let sink = MemorySink::new();
        let watchdog = Watchdog::new(scheduler.clone(), Arc::new(sink.clone()))
            .with_interval(Duration::from_millis(100));
        (scheduler, sink, watchdog)
    }

    #[test]
    fn default_interval_is_fifteen_seconds() {
        assert_eq!(Watchdog::default().interval(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn settles_before_interval_without_warning() {
        let (scheduler, sink, watchdog) = watchdog();

        let value = watchdog.guard(async { 42 }, "slow").await;
        scheduler.advance(Duration::from_secs(1));

        assert_eq!(value, 42);
        assert!(sink.warnings().is_empty());
        assert_eq!(scheduler.live_timers(), 0);
    }

    #[tokio::test]
    async fn warns_every_interval_while_pending() {
        let (scheduler, sink, watchdog) = watchdog();
        let (tx, rx) = oneshot::channel::<&str>();

        let guarded = watchdog.guard(rx, "sass is taking too long to compile @ a.scss");
        scheduler.advance(Duration::from_millis(250));
        tx.send("done").unwrap();

        assert_eq!(guarded.await.unwrap(), "done");
        assert_eq!(
            sink.warnings(),
            vec![
                "sass is taking too long to compile @ a.scss",
                "sass is taking too long to compile @ a.scss",
            ]
        );

        scheduler.advance(Duration::from_secs(5));
        assert_eq!(sink.warnings().len(), 2);
    }

    #[tokio::test]
    async fn errors_are_forwarded_unchanged() {
        let (scheduler, sink, watchdog) = watchdog();

        let result: Result<(), String> = watchdog
            .guard_every(async { Err("boom".to_string()) }, Duration::from_millis(10), "slow")
            .await;

        assert_eq!(result, Err("boom".to_string()));
        scheduler.advance(Duration::from_secs(1));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn dropping_guarded_future_cancels_timer() {
        let (scheduler, sink, watchdog) = watchdog();
        let guarded = watchdog.guard(futures::future::pending::<()>(), "stuck");

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(sink.warnings().len(), 1);

        drop(guarded);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(sink.warnings().len(), 1);
        assert_eq!(scheduler.live_timers(), 0);
    }

    #[test]
    fn pending_poll_does_not_settle() {
        let (scheduler, _sink, watchdog) = watchdog();
        let (_tx, rx) = oneshot::channel::<()>();

        let mut guarded = Box::pin(watchdog.guard(rx, "waiting"));
        assert!((&mut guarded).now_or_never().is_none());
        assert_eq!(scheduler.live_timers(), 1);
    }

    /// Scheduler that hands its tick to the test and ignores cancellation,
    /// like a timer thread that already passed its cancelled check.
    #[derive(Default)]
    struct HeldTick(Mutex<Option<Tick>>);

    impl HeldTick {
        fn run(&self) {
            if let Some(tick) = self.0.lock().as_mut() {
                tick();
            }
        }
    }

    impl Scheduler for HeldTick {
        fn every(&self, _first_delay: Duration, _period: Duration, tick: Tick) -> TimerHandle {
            *self.0.lock() = Some(tick);
            TimerHandle::new()
        }
    }

    #[tokio::test]
    async fn tick_after_settlement_does_not_warn() {
        let scheduler = Arc::new(HeldTick::default());
        let sink = MemorySink::new();
        let watchdog = Watchdog::new(scheduler.clone(), Arc::new(sink.clone()));

        let guarded = watchdog.guard(async { 7 }, "late");
        scheduler.run();
        assert_eq!(guarded.await, 7);
        scheduler.run();

        assert_eq!(sink.warnings(), vec!["late"]);
    }

    #[test]
    fn tick_after_drop_does_not_warn() {
        let scheduler = Arc::new(HeldTick::default());
        let sink = MemorySink::new();
        let watchdog = Watchdog::new(scheduler.clone(), Arc::new(sink.clone()));

        let guarded = watchdog.guard(futures::future::pending::<()>(), "stuck");
        drop(guarded);
        scheduler.run();

        assert!(sink.warnings().is_empty());
    }
}
