//! Session recorder background task

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::{state::AppState, timer::Notice};

/// Background task that records finished study phases from the notice stream
pub async fn session_recorder_task(state: Arc<AppState>, mut notices: broadcast::Receiver<Notice>) {
    info!("Starting session recorder task");

    loop {
        match notices.recv().await {
            Ok(notice) => state.record_notice(notice),
            Err(RecvError::Lagged(missed)) => {
                warn!("Session recorder fell behind, {} notices dropped", missed);
            }
            Err(RecvError::Closed) => {
                info!("Notice channel closed, session recorder exiting");
                break;
            }
        }
    }
}
