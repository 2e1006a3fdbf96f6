//! Phase timer module
//!
//! The study/break state machine and the ports it drives: display surface,
//! notifier, duration inputs and tick source.

pub mod display;
pub mod durations;
pub mod format;
pub mod mode;
pub mod notice;
pub mod phase_timer;
pub mod ticks;

// Re-export main types
pub use display::{DisplaySurface, DisplayText, SharedDisplay};
pub use durations::{parse_minutes, DurationInputs, DurationSource, RawDurations};
pub use format::format_time;
pub use mode::{TimerMode, Transition};
pub use notice::{BroadcastNotifier, Notice, Notifier};
pub use phase_timer::{PhaseTimer, TickOutcome, TimerState, TICK_PERIOD};
pub use ticks::{TickHandle, TickSource, TokioTicks};
