//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod phase_timer;
pub mod session_recorder;

// Re-export main functions
pub use phase_timer::{phase_timer_task, TimerCommand, TimerDriver};
pub use session_recorder::session_recorder_task;
