//! Timer modes and the phase transition table

use serde::{Deserialize, Serialize};

use crate::error::DurationField;

/// The phase the timer is currently in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerMode {
    #[default]
    Idle,
    Study,
    Break,
}

/// One row of the transition table: what follows a mode once its countdown runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TimerMode,
    pub to: TimerMode,
    pub message: &'static str,
    /// Sent instead of `message` when `to` cannot start and the timer settles idle
    pub fallback_message: &'static str,
}

const TRANSITIONS: &[Transition] = &[
    Transition {
        from: TimerMode::Study,
        to: TimerMode::Break,
        message: "Study session finished! Starting break.",
        fallback_message: "Study session finished! Break input invalid, timer idle.",
    },
    Transition {
        from: TimerMode::Break,
        to: TimerMode::Idle,
        message: "Break finished! Time to study again.",
        fallback_message: "Break finished! Time to study again.",
    },
];

impl TimerMode {
    /// Label shown on the mode display
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Idle => "Idle",
            TimerMode::Study => "Study",
            TimerMode::Break => "Break",
        }
    }

    /// Whether a countdown runs in this mode
    pub fn is_counting(&self) -> bool {
        self.duration_field().is_some()
    }

    /// The input a phase of this mode takes its length from
    pub fn duration_field(&self) -> Option<DurationField> {
        match self {
            TimerMode::Idle => None,
            TimerMode::Study => Some(DurationField::Study),
            TimerMode::Break => Some(DurationField::Break),
        }
    }

    /// Look up the transition taken when this mode's countdown is exhausted
    pub fn on_exhausted(&self) -> Option<&'static Transition> {
        TRANSITIONS.iter().find(|t| t.from == *self)
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
