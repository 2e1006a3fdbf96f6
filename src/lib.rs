//! Study Timer - A study/break phase timer with a small HTTP control API
//!
//! The core is [`timer::PhaseTimer`], a countdown that chains a study phase
//! into a break and then settles idle. The HTTP layer and background tasks
//! wire it to real ticks, a shared display and a session log.

pub mod config;
pub mod error;
pub mod timer;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use api::create_router;
pub use timer::{format_time, PhaseTimer, TimerMode, TimerState};
pub use utils::signals::shutdown_signal;
