//! Display surface the timer writes to

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{format_time, TimerMode};

/// Text sinks for the countdown and the mode label. The timer only writes.
pub trait DisplaySurface: Send {
    fn show_time(&mut self, text: &str);
    fn show_mode(&mut self, mode: TimerMode);
}

/// What is currently on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayText {
    pub time: String,
    pub mode: String,
}

impl Default for DisplayText {
    fn default() -> Self {
        Self {
            time: format_time(0),
            mode: TimerMode::Idle.label().to_string(),
        }
    }
}

/// Display surface shared with readers such as the status endpoint
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay {
    text: Arc<Mutex<DisplayText>>,
}

impl SharedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DisplayText {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DisplaySurface for SharedDisplay {
    fn show_time(&mut self, text: &str) {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        if current.time != text {
            debug!("Display: {}", text);
            current.time = text.to_string();
        }
    }

    fn show_mode(&mut self, mode: TimerMode) {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        if current.mode != mode.label() {
            debug!("Mode label: {}", mode);
            current.mode = mode.label().to_string();
        }
    }
}
