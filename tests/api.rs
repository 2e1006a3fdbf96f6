use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use study_timer::{
    api::create_router,
    state::AppState,
    tasks::phase_timer_task,
    timer::DurationInputs,
};

fn app() -> Router {
    // Long tick period keeps the countdown still while requests run
    let (state, driver) = AppState::new(
        20554,
        "127.0.0.1".to_string(),
        DurationInputs::new("25", "5"),
        Duration::from_secs(3600),
    );
    tokio::spawn(phase_timer_task(driver));
    create_router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_status_starts_idle() {
    let app = app();
    let (status, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "Idle");
    assert_eq!(body["display"], "00:00");
    assert_eq!(body["mode_label"], "Idle");
    assert_eq!(body["durations"]["study_minutes"], "25");
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn test_start_then_stop() {
    let app = app();

    let (status, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "study");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["ticking"], true);

    let (_, status_body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status_body["display"], "25:00");
    assert_eq!(status_body["mode_label"], "Study");
    assert_eq!(status_body["last_action"], "start");

    let (status, body) = send(&app, "POST", "/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "00:00");
    assert_eq!(body["timer"]["ticking"], false);
}

#[tokio::test]
async fn test_durations_accept_numbers_and_text() {
    let app = app();

    let (status, body) = send(
        &app,
        "PUT",
        "/durations",
        Some(json!({"study_minutes": 50, "break_minutes": "10"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["durations"]["study_minutes"], "50");
    assert_eq!(body["durations"]["break_minutes"], "10");

    let (_, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(body["timer"]["remaining_seconds"], 3000);
}

#[tokio::test]
async fn test_invalid_study_duration_is_unprocessable() {
    let app = app();
    send(&app, "PUT", "/durations", Some(json!({"study_minutes": 0}))).await;

    let (status, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["timer"]["mode"], "Idle");
}

#[tokio::test]
async fn test_blocked_follows_study_mode() {
    let app = app();
    let uri = "/blocked?url=https%3A%2F%2Fwww.youtube.com%2Fwatch";

    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blocked"], false);
    assert_eq!(body["mode"], "Idle");

    send(&app, "POST", "/start", None).await;
    let (_, body) = send(&app, "GET", uri, None).await;
    assert_eq!(body["blocked"], true);
    assert_eq!(body["url"], "https://www.youtube.com/watch");

    let (_, body) = send(&app, "GET", "/blocked?url=https%3A%2F%2Fdocs.rs", None).await;
    assert_eq!(body["blocked"], false);

    send(&app, "POST", "/stop", None).await;
    let (_, body) = send(&app, "GET", uri, None).await;
    assert_eq!(body["blocked"], false);
}

#[tokio::test]
async fn test_sessions_start_empty() {
    let app = app();
    let (status, body) = send(&app, "GET", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["sessions"], 0);
    assert_eq!(body["sessions"], json!([]));
}
