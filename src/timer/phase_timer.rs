//! The phase timer state machine

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DurationField, TimerError};

use super::{
    format_time, DisplaySurface, DurationSource, Notice, Notifier, TickHandle, TickSource,
    TimerMode,
};

/// Default period between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Published snapshot of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u64,
    /// Whether a tick source is active
    pub ticking: bool,
}

impl TimerState {
    pub fn idle() -> Self {
        Self {
            mode: TimerMode::Idle,
            remaining_seconds: 0,
            ticking: false,
        }
    }

    pub fn display(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Result of feeding one tick into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from a source that is no longer current.
    Ignored,
    /// The countdown moved on and the phase continues.
    Counted { remaining: u64 },
    /// The phase ran out and the timer moved to the next mode.
    Transitioned { from: TimerMode, to: TimerMode },
}

/// Study/break countdown.
///
/// Starts in Idle. `start` enters Study, an exhausted Study enters Break and
/// an exhausted Break settles back in Idle; `stop` returns to Idle from
/// anywhere. A tick source is held exactly while the mode counts down.
pub struct PhaseTimer {
    mode: TimerMode,
    remaining_seconds: u64,
    phase_minutes: u64,
    tick: Option<TickHandle>,
    period: Duration,
    display: Box<dyn DisplaySurface>,
    notifier: Box<dyn Notifier>,
    durations: Arc<dyn DurationSource>,
    ticks: Box<dyn TickSource>,
}

impl PhaseTimer {
    /// Create an idle timer and render the idle display
    pub fn new(
        display: Box<dyn DisplaySurface>,
        notifier: Box<dyn Notifier>,
        durations: Arc<dyn DurationSource>,
        ticks: Box<dyn TickSource>,
    ) -> Self {
        let mut timer = Self {
            mode: TimerMode::Idle,
            remaining_seconds: 0,
            phase_minutes: 0,
            tick: None,
            period: TICK_PERIOD,
            display,
            notifier,
            durations,
            ticks,
        };
        timer.render();
        timer
    }

    /// Override the tick period for phases started from now on
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_ticking(&self) -> bool {
        self.tick.is_some()
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            mode: self.mode,
            remaining_seconds: self.remaining_seconds,
            ticking: self.is_ticking(),
        }
    }

    /// Begin a fresh study phase, replacing whatever is running.
    ///
    /// The study input is validated first; on error nothing changes.
    pub fn start(&mut self) -> Result<(), TimerError> {
        let seconds = self.durations.phase_seconds(DurationField::Study)?;
        if self.mode != TimerMode::Idle {
            info!("Restarting study phase (was {})", self.mode);
        }
        self.enter(TimerMode::Study, seconds);
        info!("Study phase started: {}", format_time(seconds));
        Ok(())
    }

    /// Cancel any countdown and return to Idle
    pub fn stop(&mut self) {
        if self.mode != TimerMode::Idle {
            info!("Timer stopped during {} phase", self.mode);
        }
        self.enter(TimerMode::Idle, 0);
    }

    /// Advance the countdown by one tick from `handle`
    pub fn on_tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.tick != Some(handle) {
            debug!("Ignoring stale tick from source {}", handle.id());
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.display.show_time(&format_time(self.remaining_seconds));

        if self.remaining_seconds > 0 {
            return TickOutcome::Counted {
                remaining: self.remaining_seconds,
            };
        }
        self.advance()
    }

    fn advance(&mut self) -> TickOutcome {
        let from = self.mode;
        let completed_minutes = self.phase_minutes;

        let Some(transition) = from.on_exhausted() else {
            self.enter(TimerMode::Idle, 0);
            return TickOutcome::Transitioned {
                from,
                to: TimerMode::Idle,
            };
        };

        let (to, seconds, message) = match transition.to.duration_field() {
            None => (transition.to, 0, transition.message),
            Some(field) => match self.durations.phase_seconds(field) {
                Ok(seconds) => (transition.to, seconds, transition.message),
                Err(e) => {
                    warn!("Cannot enter {} phase: {}; settling in Idle", transition.to, e);
                    (TimerMode::Idle, 0, transition.fallback_message)
                }
            },
        };

        self.enter(to, seconds);
        info!("{} phase complete, now {}", from, to);

        self.notifier.notify(&Notice {
            completed: from,
            next: to,
            message: message.to_string(),
            completed_minutes,
            next_minutes: to.is_counting().then_some(seconds / 60),
            timestamp: Utc::now(),
        });

        TickOutcome::Transitioned { from, to }
    }

    /// Swap in a new phase: cancel the old source, render, start a new source if counting
    fn enter(&mut self, mode: TimerMode, seconds: u64) {
        if let Some(handle) = self.tick.take() {
            self.ticks.cancel(handle);
        }

        self.mode = mode;
        self.remaining_seconds = seconds;
        self.phase_minutes = seconds / 60;
        self.render();

        if mode.is_counting() {
            self.tick = Some(self.ticks.begin(self.period));
        }
    }

    fn render(&mut self) {
        self.display.show_mode(self.mode);
        self.display.show_time(&format_time(self.remaining_seconds));
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.ticks.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::timer::DurationInputs;

    #[derive(Debug, Default)]
    struct TickLog {
        next_id: u64,
        active: Vec<TickHandle>,
        begun: usize,
    }

    #[derive(Clone, Default)]
    struct ManualTicks(Arc<Mutex<TickLog>>);

    impl TickSource for ManualTicks {
        fn begin(&mut self, _period: Duration) -> TickHandle {
            let mut log = self.0.lock().unwrap();
            log.next_id += 1;
            log.begun += 1;
            let handle = TickHandle::new(log.next_id);
            log.active.push(handle);
            handle
        }

        fn cancel(&mut self, handle: TickHandle) {
            self.0.lock().unwrap().active.retain(|h| *h != handle);
        }
    }

    #[derive(Clone, Default)]
    struct Screen(Arc<Mutex<(Vec<String>, Vec<TimerMode>)>>);

    impl DisplaySurface for Screen {
        fn show_time(&mut self, text: &str) {
            self.0.lock().unwrap().0.push(text.to_string());
        }

        fn show_mode(&mut self, mode: TimerMode) {
            self.0.lock().unwrap().1.push(mode);
        }
    }

    impl Screen {
        fn time(&self) -> String {
            self.0.lock().unwrap().0.last().cloned().unwrap()
        }

        fn mode(&self) -> TimerMode {
            *self.0.lock().unwrap().1.last().unwrap()
        }
    }

    #[derive(Clone, Default)]
    struct Alerts(Arc<Mutex<Vec<Notice>>>);

    impl Notifier for Alerts {
        fn notify(&mut self, notice: &Notice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    struct Harness {
        timer: PhaseTimer,
        ticks: ManualTicks,
        screen: Screen,
        alerts: Alerts,
        inputs: DurationInputs,
    }

    impl Harness {
        fn new(study: &str, brk: &str) -> Self {
            let ticks = ManualTicks::default();
            let screen = Screen::default();
            let alerts = Alerts::default();
            let inputs = DurationInputs::new(study, brk);
            let timer = PhaseTimer::new(
                Box::new(screen.clone()),
                Box::new(alerts.clone()),
                Arc::new(inputs.clone()),
                Box::new(ticks.clone()),
            );
            Self {
                timer,
                ticks,
                screen,
                alerts,
                inputs,
            }
        }

        fn active(&self) -> Vec<TickHandle> {
            self.ticks.0.lock().unwrap().active.clone()
        }

        /// Deliver `n` ticks from whichever source is current
        fn tick(&mut self, n: u64) -> TickOutcome {
            let mut outcome = TickOutcome::Ignored;
            for _ in 0..n {
                let handle = *self.active().last().expect("no active tick source");
                outcome = self.timer.on_tick(handle);
            }
            outcome
        }

        fn notices(&self) -> Vec<Notice> {
            self.alerts.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn new_timer_is_idle_and_rendered() {
        let h = Harness::new("25", "5");
        assert_eq!(h.timer.state(), TimerState::idle());
        assert_eq!(h.screen.time(), "00:00");
        assert_eq!(h.screen.mode(), TimerMode::Idle);
        assert!(h.active().is_empty());
    }

    #[test]
    fn start_enters_study_before_any_tick() {
        let mut h = Harness::new("25", "5");
        h.timer.start().unwrap();

        assert_eq!(h.timer.mode(), TimerMode::Study);
        assert_eq!(h.timer.remaining_seconds(), 1500);
        assert_eq!(h.screen.time(), "25:00");
        assert_eq!(h.screen.mode(), TimerMode::Study);
        assert_eq!(h.active().len(), 1);
    }

    #[test]
    fn each_tick_counts_down_and_renders() {
        let mut h = Harness::new("1", "1");
        h.timer.start().unwrap();

        assert_eq!(h.tick(1), TickOutcome::Counted { remaining: 59 });
        assert_eq!(h.screen.time(), "00:59");
        assert_eq!(h.tick(58), TickOutcome::Counted { remaining: 1 });
        assert_eq!(h.screen.time(), "00:01");
    }

    #[test]
    fn exhausted_study_enters_break_with_fresh_break_input() {
        let mut h = Harness::new("2", "5");
        h.timer.start().unwrap();
        h.inputs.set(DurationField::Break, "3");

        assert_eq!(h.tick(119), TickOutcome::Counted { remaining: 1 });
        assert_eq!(
            h.tick(1),
            TickOutcome::Transitioned {
                from: TimerMode::Study,
                to: TimerMode::Break
            }
        );
        assert_eq!(h.timer.mode(), TimerMode::Break);
        assert_eq!(h.timer.remaining_seconds(), 180);
        assert_eq!(h.screen.time(), "03:00");
        assert_eq!(h.screen.mode(), TimerMode::Break);
        assert_eq!(h.active().len(), 1);

        let notices = h.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Study session finished! Starting break.");
        assert_eq!(notices[0].completed_minutes, 2);
        assert_eq!(notices[0].next_minutes, Some(3));
    }

    #[test]
    fn full_cycle_settles_idle_with_no_tick_source() {
        let mut h = Harness::new("1", "2");
        h.timer.start().unwrap();
        h.tick(60);
        let outcome = h.tick(120);

        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: TimerMode::Break,
                to: TimerMode::Idle
            }
        );
        assert_eq!(h.timer.state(), TimerState::idle());
        assert_eq!(h.screen.time(), "00:00");
        assert_eq!(h.screen.mode(), TimerMode::Idle);
        assert!(h.active().is_empty());

        let notices = h.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1].message, "Break finished! Time to study again.");
        assert_eq!(notices[1].next, TimerMode::Idle);
        assert_eq!(notices[1].next_minutes, None);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut h = Harness::new("1", "1");
        h.timer.start().unwrap();
        h.tick(10);

        h.timer.stop();
        assert_eq!(h.timer.state(), TimerState::idle());
        assert_eq!(h.screen.time(), "00:00");
        assert!(h.active().is_empty());

        h.timer.stop();
        assert_eq!(h.timer.state(), TimerState::idle());
        assert_eq!(h.ticks.0.lock().unwrap().begun, 1);
        assert!(h.notices().is_empty());
    }

    #[test]
    fn restart_drops_ticks_from_the_previous_source() {
        let mut h = Harness::new("1", "1");
        h.timer.start().unwrap();
        let old = h.active()[0];
        h.tick(30);

        h.inputs.set(DurationField::Study, "2");
        h.timer.start().unwrap();
        assert_eq!(h.timer.remaining_seconds(), 120);
        assert_eq!(h.active().len(), 1);
        assert_ne!(h.active()[0], old);

        assert_eq!(h.timer.on_tick(old), TickOutcome::Ignored);
        assert_eq!(h.timer.remaining_seconds(), 120);
    }

    #[test]
    fn restart_during_break_begins_a_new_study_phase() {
        let mut h = Harness::new("1", "5");
        h.timer.start().unwrap();
        h.tick(60);
        assert_eq!(h.timer.mode(), TimerMode::Break);

        h.timer.start().unwrap();
        assert_eq!(h.timer.mode(), TimerMode::Study);
        assert_eq!(h.timer.remaining_seconds(), 60);
        assert_eq!(h.active().len(), 1);
    }

    #[test]
    fn invalid_study_input_leaves_state_untouched() {
        let mut h = Harness::new("1", "1");
        h.timer.start().unwrap();
        h.tick(5);

        h.inputs.set(DurationField::Study, "zero");
        let err = h.timer.start().unwrap_err();
        assert!(matches!(
            err,
            TimerError::InvalidDuration {
                field: DurationField::Study,
                ..
            }
        ));
        assert_eq!(h.timer.mode(), TimerMode::Study);
        assert_eq!(h.timer.remaining_seconds(), 55);
        assert_eq!(h.active().len(), 1);
    }

    #[test]
    fn invalid_break_input_settles_idle_after_study() {
        let mut h = Harness::new("1", "5");
        h.timer.start().unwrap();
        h.inputs.set(DurationField::Break, "0");

        let outcome = h.tick(60);
        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: TimerMode::Study,
                to: TimerMode::Idle
            }
        );
        assert_eq!(h.timer.state(), TimerState::idle());
        assert!(h.active().is_empty());

        let notices = h.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].next, TimerMode::Idle);
        assert_eq!(
            notices[0].message,
            "Study session finished! Break input invalid, timer idle."
        );
        assert_eq!(notices[0].next_minutes, None);
    }

    #[test]
    fn ticks_while_idle_are_ignored() {
        let mut h = Harness::new("1", "1");
        assert_eq!(h.timer.on_tick(TickHandle::new(42)), TickOutcome::Ignored);
        assert_eq!(h.timer.state(), TimerState::idle());
    }
}
