//! Lifecycle of one build pass: progress while it runs, a summary when it ends.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kiln_config::ReporterConfig;

use crate::plugin::PluginInvoker;
use crate::progress::{ProgressAnimator, ProgressHandle};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::sink::{LogSink, TracingSink};
use crate::summary::{PassSnapshot, summarize_at};
use crate::watchdog::Watchdog;

/// One run of the pipeline, bounded by a fixed start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    start_time: DateTime<Utc>,
}

impl Pass {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Time since the pass started, zero if `now` is before the start.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).to_std().unwrap_or(Duration::ZERO)
    }

    /// Empty snapshot stamped with this pass's start time.
    pub fn snapshot(&self) -> PassSnapshot {
        PassSnapshot::new(self.start_time)
    }
}

/// Drives the progress ticker and the summary line for successive passes.
///
/// ```no_run
/// # async fn run() {
/// use kiln_config::ReporterConfig;
/// use kiln_core::PassReporter;
///
/// let mut reporter = PassReporter::from_config(&ReporterConfig::default());
/// let pass = reporter.begin();
/// // ... run plugins, collect the pass's files ...
/// let line = reporter.finish(&pass.snapshot());
/// println!("{line}");
/// # }
/// ```
pub struct PassReporter {
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn LogSink>,
    animator: ProgressAnimator,
    watchdog_interval: Duration,
    progress: bool,
    clock: fn() -> DateTime<Utc>,
    active: Option<ActivePass>,
}

struct ActivePass {
    pass: Pass,
    ticker: Option<ProgressHandle>,
}

impl PassReporter {
    pub fn new(config: &ReporterConfig, scheduler: Arc<dyn Scheduler>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            animator: ProgressAnimator::new(scheduler.clone()).with_interval(config.progress_interval()),
            scheduler,
            sink,
            watchdog_interval: config.watchdog_interval(),
            progress: config.progress,
            clock: Utc::now,
            active: None,
        }
    }

    /// Read the wall clock through `clock` instead of [`Utc::now`].
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Reporter on the Tokio clock, logging through `tracing`.
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self::new(config, Arc::new(TokioScheduler), Arc::new(TracingSink))
    }

    /// Invoker whose watchdog shares this reporter's clock, sink and interval.
    pub fn invoker(&self) -> PluginInvoker {
        PluginInvoker::new(
            Watchdog::new(self.scheduler.clone(), self.sink.clone()).with_interval(self.watchdog_interval),
        )
    }

    /// The pass in progress, if any.
    pub fn current(&self) -> Option<Pass> {
        self.active.as_ref().map(|active| active.pass)
    }

    pub fn is_animating(&self) -> bool {
        self.active
            .as_ref()
            .and_then(|active| active.ticker.as_ref())
            .is_some_and(|ticker| !ticker.is_cancelled())
    }

    /// Start a pass now.
    pub fn begin(&mut self) -> Pass {
        self.begin_at((self.clock)())
    }

    /// Start a pass that began at `start_time`.
    ///
    /// The first progress tick is due one interval after `start_time`, as read
    /// by the reporter's clock. A pass still in progress is abandoned without
    /// a summary.
    pub fn begin_at(&mut self, start_time: DateTime<Utc>) -> Pass {
        if let Some(previous) = self.active.take() {
            tracing::debug!(start = %previous.pass.start_time, "abandoning unfinished pass");
        }

        let pass = Pass::new(start_time);
        let ticker = self
            .progress
            .then(|| self.animator.start_logging(pass.elapsed_at((self.clock)()), self.sink.clone()));
        tracing::debug!(start = %start_time, progress = self.progress, "pass started");

        self.active = Some(ActivePass { pass, ticker });
        pass
    }

    /// End the current pass and log its summary line at info level.
    pub fn finish(&mut self, snapshot: &PassSnapshot) -> String {
        self.finish_at(snapshot, (self.clock)())
    }

    /// Like [`finish`](Self::finish) with an explicit clock reading.
    pub fn finish_at(&mut self, snapshot: &PassSnapshot, now: DateTime<Utc>) -> String {
        if let Some(active) = self.active.take() {
            if let Some(ticker) = active.ticker {
                ticker.cancel();
            }
            if active.pass.start_time != snapshot.start_time {
                tracing::debug!(
                    pass = %active.pass.start_time,
                    snapshot = %snapshot.start_time,
                    "snapshot start time differs from the pass"
                );
            }
        }

        let line = summarize_at(snapshot, now);
        self.sink.info(&line);
        line
    }
}

impl std::fmt::Debug for PassReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassReporter")
            .field("progress", &self.progress)
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
