//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    error::{DurationField, TimerError},
    state::AppState,
};
use super::responses::{
    ApiResponse, BlockedQuery, BlockedResponse, DurationsRequest, DurationsResponse,
    HealthResponse, SessionsResponse, StatusResponse,
};

type ErrorReply = (StatusCode, Json<ApiResponse>);

fn error_reply(state: &AppState, err: TimerError) -> ErrorReply {
    let status = match err {
        TimerError::InvalidDuration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TimerError::TimerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        status,
        Json(ApiResponse::error(err.to_string(), state.get_timer_state().into())),
    )
}

/// Handle POST /start - Begin a fresh study phase
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ErrorReply> {
    match state.start_timer().await {
        Ok(timer) => {
            info!("Start endpoint called - study phase running");
            Ok(Json(ApiResponse::for_mode(
                "Study phase started".to_string(),
                timer.into(),
            )))
        }
        Err(e) => {
            warn!("Failed to start timer: {}", e);
            Err(error_reply(&state, e))
        }
    }
}

/// Handle POST /stop - Cancel the countdown and return to Idle
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ErrorReply> {
    match state.stop_timer().await {
        Ok(timer) => {
            info!("Stop endpoint called - timer idle");
            Ok(Json(ApiResponse::for_mode(
                "Timer stopped".to_string(),
                timer.into(),
            )))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(error_reply(&state, e))
        }
    }
}

/// Handle PUT /durations - Overwrite the raw duration inputs
pub async fn durations_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationsRequest>,
) -> Json<DurationsResponse> {
    if let Some(study) = request.study_minutes {
        state.set_duration(DurationField::Study, study.into_text());
    }
    if let Some(brk) = request.break_minutes {
        state.set_duration(DurationField::Break, brk.into_text());
    }

    Json(DurationsResponse {
        durations: state.get_durations(),
        timestamp: Utc::now(),
    })
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let display = state.get_display();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.get_timer_state().into(),
        mode_label: display.mode,
        display: display.time,
        durations: state.get_durations(),
        last_notice: state.get_last_notice(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /sessions - Return logged study sessions and their summary
pub async fn sessions_handler(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        stats: state.session_stats(),
        sessions: state.session_records(),
    })
}

/// Handle GET /blocked - Check a URL against the blocklist for the current mode
pub async fn blocked_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlockedQuery>,
) -> Json<BlockedResponse> {
    let blocked = state.is_blocked(&query.url);
    if blocked {
        info!("Blocked {} during study phase", query.url);
    }
    Json(BlockedResponse {
        mode: state.get_timer_state().mode,
        url: query.url,
        blocked,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
