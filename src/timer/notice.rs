//! Phase completion notices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::TimerMode;

/// Sent each time a phase runs out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub completed: TimerMode,
    pub next: TimerMode,
    pub message: String,
    /// Length of the phase that just finished
    pub completed_minutes: u64,
    /// Length of the phase that was entered, if it counts down
    pub next_minutes: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// Receives phase completion notices. Must not block the caller.
pub trait Notifier: Send {
    fn notify(&mut self, notice: &Notice);
}

/// Logs notices and fans them out to any subscribers
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notice>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<Notice>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&mut self, notice: &Notice) {
        info!("{}", notice.message);
        if self.tx.send(notice.clone()).is_err() {
            debug!("No notice subscribers");
        }
    }
}
