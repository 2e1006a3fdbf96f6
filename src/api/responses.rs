//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{SessionRecord, SessionStats},
    timer::{Notice, RawDurations, TimerMode, TimerState},
};

/// Timer snapshot embedded in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub mode: TimerMode,
    pub display: String,
    pub remaining_seconds: u64,
    pub ticking: bool,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            mode: state.mode,
            display: state.display(),
            remaining_seconds: state.remaining_seconds,
            ticking: state.ticking,
        }
    }
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerView) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response describing the timer's current mode
    pub fn for_mode(message: String, timer: TimerView) -> Self {
        let status = timer.mode.label().to_lowercase();
        Self::new(status, message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerView) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// A minutes value as typed: either a JSON number or free text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMinutes {
    Number(i64),
    Text(String),
}

impl RawMinutes {
    pub fn into_text(self) -> String {
        match self {
            RawMinutes::Number(n) => n.to_string(),
            RawMinutes::Text(text) => text,
        }
    }
}

/// Body of PUT /durations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DurationsRequest {
    pub study_minutes: Option<RawMinutes>,
    pub break_minutes: Option<RawMinutes>,
}

/// Response of PUT /durations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsResponse {
    pub durations: RawDurations,
    pub timestamp: DateTime<Utc>,
}

/// Status response with timer, display and session information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub mode_label: String,
    pub display: String,
    pub durations: RawDurations,
    pub last_notice: Option<Notice>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Session log response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub stats: SessionStats,
    pub sessions: Vec<SessionRecord>,
}

/// Query of GET /blocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedQuery {
    pub url: String,
}

/// Response of GET /blocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedResponse {
    pub url: String,
    pub blocked: bool,
    pub mode: TimerMode,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
