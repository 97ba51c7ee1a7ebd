//! Countdown / elapsed-time tracking for an exam attempt.
//!
//! The timing logic lives in [`TimerClock`], a second-granularity state
//! machine with no internal thread: whoever drives it calls `tick()` once per
//! second. [`ExamTimer`] wraps it in a spawned tokio task for hosts that want
//! the one-second cadence handled for them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use exam_core::time::format_clock;

//
// ─── TIMER CLOCK ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerMode {
    /// Counts down from a fixed duration and expires at zero.
    Countdown { total: u32, remaining: u32 },
    /// Counts up from the start; never expires.
    Stopwatch { elapsed: u32 },
}

/// One second of timer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerTick {
    /// Zero-padded `MM:SS`, remaining for a countdown, elapsed for a stopwatch.
    pub display: String,
    /// Set on the final tick of a countdown, exactly once per run.
    pub expired: bool,
}

/// Pure timer state machine: Idle -> Running -> Stopped.
///
/// There is no Paused state; a new run always goes through `start`, which
/// resets the count fully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerClock {
    state: TimerState,
    mode: TimerMode,
}

impl TimerClock {
    /// A countdown over the given number of seconds, initially idle.
    #[must_use]
    pub fn countdown(duration_secs: u32) -> Self {
        Self {
            state: TimerState::Idle,
            mode: TimerMode::Countdown {
                total: duration_secs,
                remaining: duration_secs,
            },
        }
    }

    /// An elapsed-time stopwatch, initially idle.
    #[must_use]
    pub fn stopwatch() -> Self {
        Self {
            state: TimerState::Idle,
            mode: TimerMode::Stopwatch { elapsed: 0 },
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Begin (or begin again) from a full reset.
    pub fn start(&mut self) {
        self.mode = match self.mode {
            TimerMode::Countdown { total, .. } => TimerMode::Countdown {
                total,
                remaining: total,
            },
            TimerMode::Stopwatch { .. } => TimerMode::Stopwatch { elapsed: 0 },
        };
        self.state = TimerState::Running;
    }

    /// Halt the cadence. Safe to call in any state, any number of times.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Current display value without advancing the clock.
    #[must_use]
    pub fn display(&self) -> String {
        match self.mode {
            TimerMode::Countdown { remaining, .. } => format_clock(remaining),
            TimerMode::Stopwatch { elapsed } => format_clock(elapsed),
        }
    }

    /// Advance one second.
    ///
    /// Returns `None` unless the clock is running. A countdown's final tick
    /// carries `expired = true` and moves the clock to Stopped, so expiry is
    /// reported exactly once; a stopwatch never expires.
    pub fn tick(&mut self) -> Option<TimerTick> {
        if self.state != TimerState::Running {
            return None;
        }
        match &mut self.mode {
            TimerMode::Countdown { remaining, .. } => {
                let display = format_clock(*remaining);
                if *remaining == 0 {
                    self.state = TimerState::Stopped;
                    Some(TimerTick {
                        display,
                        expired: true,
                    })
                } else {
                    *remaining -= 1;
                    Some(TimerTick {
                        display,
                        expired: false,
                    })
                }
            }
            TimerMode::Stopwatch { elapsed } => {
                let display = format_clock(*elapsed);
                *elapsed += 1;
                Some(TimerTick {
                    display,
                    expired: false,
                })
            }
        }
    }
}

//
// ─── EXAM TIMER ────────────────────────────────────────────────────────────────
//

struct ActiveTimer {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// One-second cadence driver over [`TimerClock`].
///
/// At most one run is active: `start_*` implicitly stops the previous run,
/// and `stop` guarantees no further callback fires after it returns (the
/// cancellation flag is checked before every callback, then the task is
/// aborted). Callbacks never see the timer itself, so a handler cannot
/// restart the timer it is running inside.
///
/// Must be used within a tokio runtime.
pub struct ExamTimer {
    active: Option<ActiveTimer>,
}

impl ExamTimer {
    #[must_use]
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Start a countdown. `on_tick` receives the `MM:SS` remaining-time
    /// display once immediately and then every second; `on_expire` runs
    /// exactly once when the countdown reaches zero.
    pub fn start_countdown<T, E>(&mut self, duration_secs: u32, on_tick: T, on_expire: E)
    where
        T: FnMut(String) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.spawn(
            TimerClock::countdown(duration_secs),
            Box::new(on_tick),
            Some(Box::new(on_expire)),
        );
    }

    /// Start an elapsed-time stopwatch. `on_tick` receives the `MM:SS`
    /// elapsed display once immediately and then every second.
    pub fn start_stopwatch<T>(&mut self, on_tick: T)
    where
        T: FnMut(String) + Send + 'static,
    {
        self.spawn(TimerClock::stopwatch(), Box::new(on_tick), None);
    }

    fn spawn(
        &mut self,
        mut clock: TimerClock,
        mut on_tick: Box<dyn FnMut(String) + Send>,
        mut on_expire: Option<Box<dyn FnOnce() + Send>>,
    ) {
        self.stop();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let task = tokio::spawn(async move {
            clock.start();
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                // The first interval tick completes immediately, matching the
                // initial display update at start.
                interval.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                let Some(tick) = clock.tick() else { break };
                on_tick(tick.display);
                if tick.expired {
                    tracing::debug!("countdown expired");
                    if let Some(expire) = on_expire.take() {
                        expire();
                    }
                    break;
                }
            }
        });

        self.active = Some(ActiveTimer { cancelled, task });
    }

    /// Halt the cadence. Idempotent; after it returns no further tick or
    /// expiry callback will fire.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancelled.store(true, Ordering::SeqCst);
            active.task.abort();
        }
    }

    /// True while a run is active and has neither finished nor been stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.cancelled.load(Ordering::SeqCst) && !a.task.is_finished())
    }
}

impl Default for ExamTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn countdown_ticks_down_and_expires_once() {
        let mut clock = TimerClock::countdown(2);
        assert_eq!(clock.state(), TimerState::Idle);
        assert!(clock.tick().is_none());

        clock.start();
        assert_eq!(
            clock.tick(),
            Some(TimerTick {
                display: "00:02".into(),
                expired: false
            })
        );
        assert_eq!(
            clock.tick(),
            Some(TimerTick {
                display: "00:01".into(),
                expired: false
            })
        );
        let last = clock.tick().unwrap();
        assert_eq!(last.display, "00:00");
        assert!(last.expired);
        assert_eq!(clock.state(), TimerState::Stopped);

        // Once expired, nothing more comes out.
        assert!(clock.tick().is_none());
        clock.stop();
        assert!(clock.tick().is_none());
    }

    #[test]
    fn zero_second_countdown_expires_on_first_tick() {
        let mut clock = TimerClock::countdown(0);
        clock.start();
        let tick = clock.tick().unwrap();
        assert_eq!(tick.display, "00:00");
        assert!(tick.expired);
    }

    #[test]
    fn stopwatch_counts_up_from_zero() {
        let mut clock = TimerClock::stopwatch();
        clock.start();
        assert_eq!(clock.tick().unwrap().display, "00:00");
        assert_eq!(clock.tick().unwrap().display, "00:01");
        assert_eq!(clock.tick().unwrap().display, "00:02");
        assert_eq!(clock.state(), TimerState::Running);
    }

    #[test]
    fn restart_resets_the_count() {
        let mut clock = TimerClock::countdown(90);
        clock.start();
        clock.tick();
        clock.tick();
        clock.stop();

        clock.start();
        assert_eq!(clock.display(), "01:30");
        assert_eq!(clock.tick().unwrap().display, "01:30");
    }

    #[test]
    fn stop_is_an_idempotent_no_op() {
        let mut clock = TimerClock::stopwatch();
        clock.stop();
        clock.stop();
        assert_eq!(clock.state(), TimerState::Stopped);
        assert!(clock.tick().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_delivers_ticks_and_expiry() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let expiries = Arc::new(AtomicU32::new(0));

        let mut timer = ExamTimer::new();
        {
            let ticks = Arc::clone(&ticks);
            let expiries = Arc::clone(&expiries);
            timer.start_countdown(
                2,
                move |display| ticks.lock().unwrap().push(display),
                move || {
                    expiries.fetch_add(1, Ordering::SeqCst);
                },
            );
        }

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(
            *ticks.lock().unwrap(),
            vec!["00:02".to_string(), "00:01".into(), "00:00".into()]
        );
        assert_eq!(expiries.load(Ordering::SeqCst), 1);

        // Stopping after expiry is a safe no-op.
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_the_cadence() {
        let ticks = Arc::new(Mutex::new(Vec::new()));

        let mut timer = ExamTimer::new();
        {
            let ticks = Arc::clone(&ticks);
            timer.start_stopwatch(move |display| ticks.lock().unwrap().push(display));
        }

        tokio::time::sleep(Duration::from_millis(2500)).await;
        timer.stop();
        let seen = ticks.lock().unwrap().len();
        assert!(seen >= 2);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(ticks.lock().unwrap().len(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_again_stops_the_previous_run() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut timer = ExamTimer::new();
        {
            let first = Arc::clone(&first);
            timer.start_countdown(30, move |d| first.lock().unwrap().push(d), || {});
        }
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let second = Arc::clone(&second);
            timer.start_stopwatch(move |d| second.lock().unwrap().push(d));
        }
        let first_seen = first.lock().unwrap().len();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(first.lock().unwrap().len(), first_seen);
        assert!(second.lock().unwrap().len() >= 3);
        assert!(timer.is_running());
    }
}
