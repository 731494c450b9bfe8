//! Animated "compiling..." status shown while a pass is running.
//!
//! Tick `n` renders `"compiling"` for n < 7 and `"still compiling"` from then
//! on, followed by `n % 4` dots. The dot cycle and the wording switch share the
//! tick counter but run on independent schedules.

use std::sync::Arc;
use std::time::Duration;

use kiln_config::DEFAULT_PROGRESS_INTERVAL_MS;

use crate::scheduler::{Scheduler, TimerHandle, TokioScheduler};
use crate::sink::LogSink;

/// First tick index rendered as "still compiling".
const STILL_COMPILING_FROM: u64 = 7;

const DOT_CYCLE: u64 = 4;

/// Text for tick `tick`.
///
/// ```
/// use kiln_core::progress::progress_line;
///
/// assert_eq!(progress_line(0), "compiling");
/// assert_eq!(progress_line(3), "compiling...");
/// assert_eq!(progress_line(9), "still compiling.");
/// ```
pub fn progress_line(tick: u64) -> String {
    let phase = if tick < STILL_COMPILING_FROM {
        "compiling"
    } else {
        "still compiling"
    };
    let dots = (tick % DOT_CYCLE) as usize;
    format!("{}{}", phase, ".".repeat(dots))
}

/// Starts recurring progress tickers.
#[derive(Clone)]
pub struct ProgressAnimator {
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
}

impl ProgressAnimator {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delay before the first tick of a pass that has been running for `elapsed`.
    ///
    /// Keeps the animation on its natural cadence instead of restarting it.
    pub fn first_delay(&self, elapsed: Duration) -> Duration {
        self.interval.saturating_sub(elapsed)
    }

    /// Start ticking; `emit` receives one line per tick.
    pub fn start<E>(&self, elapsed: Duration, mut emit: E) -> ProgressHandle
    where
        E: FnMut(&str) + Send + 'static,
    {
        let mut tick = 0u64;
        let timer = self.scheduler.every(
            self.first_delay(elapsed),
            self.interval,
            Box::new(move || {
                emit(&progress_line(tick));
                tick += 1;
            }),
        );
        ProgressHandle { timer }
    }

    /// Start ticking into `sink` at info level.
    pub fn start_logging(&self, elapsed: Duration, sink: Arc<dyn LogSink>) -> ProgressHandle {
        self.start(elapsed, move |line| sink.info(line))
    }
}

impl Default for ProgressAnimator {
    fn default() -> Self {
        Self::new(Arc::new(TokioScheduler))
    }
}

impl std::fmt::Debug for ProgressAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressAnimator")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Cancels a running progress ticker. Dropping the handle cancels it too.
#[must_use = "dropping the handle stops the progress ticker"]
#[derive(Debug)]
pub struct ProgressHandle {
    timer: TimerHandle,
}

impl ProgressHandle {
    /// Stop all future ticks. Safe to call any number of times.
    pub fn cancel(&self) -> bool {
        self.timer.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.timer.is_cancelled()
    }

    /// Ticks emitted so far.
    pub fn ticks(&self) -> u64 {
        self.timer.ticks()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}
