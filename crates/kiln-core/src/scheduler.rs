//! Recurring timers behind an injectable scheduler.
//!
//! The watchdog and the progress ticker never touch a clock directly. They ask
//! a [`Scheduler`] for a recurring timer and get back a [`TimerHandle`], a small
//! owned state object recording how often the timer fired and whether it was
//! cancelled. [`TokioScheduler`] drives timers on the Tokio runtime;
//! [`ManualScheduler`] keeps virtual time that tests advance explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Callback run on every timer fire.
pub type Tick = Box<dyn FnMut() + Send + 'static>;

/// Smallest period a timer may have; shorter periods are clamped.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Source of recurring timers.
pub trait Scheduler: Send + Sync {
    /// Fire `tick` after `first_delay`, then every `period`, until the
    /// returned handle is cancelled.
    fn every(&self, first_delay: Duration, period: Duration, tick: Tick) -> TimerHandle;
}

#[derive(Debug, Default)]
struct TimerState {
    ticks: AtomicU64,
    cancelled: AtomicBool,
    abort: Mutex<Option<AbortHandle>>,
}

/// Handle to a recurring timer.
///
/// Clones share state. Cancelling stops future fires only; a tick already
/// running completes.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    state: Arc<TimerState>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop all future fires.
    ///
    /// Idempotent. Returns `true` only for the call that actually cancelled
    /// the timer.
    pub fn cancel(&self) -> bool {
        if self.state.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(abort) = self.state.abort.lock().take() {
            abort.abort();
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Number of times the timer has fired.
    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::SeqCst)
    }

    /// Run `tick` unless cancelled. Returns whether the timer is still live.
    pub fn fire(&self, tick: &mut Tick) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.state.ticks.fetch_add(1, Ordering::SeqCst);
        tick();
        true
    }

    fn attach(&self, abort: AbortHandle) {
        let mut slot = self.state.abort.lock();
        if self.is_cancelled() {
            abort.abort();
        } else {
            *slot = Some(abort);
        }
    }
}

/// Scheduler backed by `tokio::time`.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn every(&self, first_delay: Duration, period: Duration, mut tick: Tick) -> TimerHandle {
        let handle = TimerHandle::new();
        let task_handle = handle.clone();
        let period = period.max(MIN_PERIOD);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + first_delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !task_handle.fire(&mut tick) {
                    break;
                }
            }
        });
        handle.attach(task.abort_handle());
        tracing::trace!(?first_delay, ?period, "timer started");

        handle
    }
}

struct ManualTimer {
    due: Duration,
    period: Duration,
    handle: TimerHandle,
    tick: Arc<Mutex<Tick>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    timers: Vec<ManualTimer>,
}

/// Scheduler with virtual time.
///
/// Nothing fires until [`ManualScheduler::advance`] is called; timers due
/// within the advanced window fire in deadline order, ties in creation order.
///
/// ```
/// use kiln_core::scheduler::{ManualScheduler, Scheduler};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = fired.clone();
/// let timer = scheduler.every(
///     Duration::from_secs(1),
///     Duration::from_secs(1),
///     Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// scheduler.advance(Duration::from_millis(3500));
/// assert_eq!(fired.load(Ordering::SeqCst), 3);
/// timer.cancel();
/// scheduler.advance(Duration::from_secs(10));
/// assert_eq!(fired.load(Ordering::SeqCst), 3);
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers that have not been cancelled.
    pub fn live_timers(&self) -> usize {
        self.state
            .lock()
            .timers
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    /// Move virtual time forward, firing every timer that comes due.
    ///
    /// Ticks run without the scheduler lock held, so a tick may cancel
    /// timers or start new ones.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let due = {
                let mut state = self.state.lock();
                state.timers.retain(|t| !t.handle.is_cancelled());

                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let timer = &mut state.timers[index];
                        let at = timer.due;
                        timer.due += timer.period;
                        let fired = (timer.handle.clone(), timer.tick.clone());
                        state.now = at;
                        fired
                    }
                    None => {
                        state.now = target;
                        break;
                    }
                }
            };

            let (handle, tick) = due;
            let mut tick = tick.lock();
            handle.fire(&mut *tick);
        }
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, first_delay: Duration, period: Duration, tick: Tick) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut state = self.state.lock();
        let due = state.now + first_delay;
        state.timers.push(ManualTimer {
            due,
            period: period.max(MIN_PERIOD),
            handle: handle.clone(),
            tick: Arc::new(Mutex::new(tick)),
        });
        handle
    }
}
