//! State management module
//!
//! This module contains the shared application state, the session log and the study blocklist.

pub mod app_state;
pub mod blocklist;
pub mod session_log;

// Re-export main types
pub use app_state::AppState;
pub use blocklist::Blocklist;
pub use session_log::{SessionLog, SessionRecord, SessionStats};
