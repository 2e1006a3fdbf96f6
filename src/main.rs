//! Study Timer - A study/break phase timer with a small HTTP control API
//!
//! This is the main entry point for the study-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use study_timer::{
    config::Config,
    state::{AppState, Blocklist},
    api::create_router,
    tasks::{phase_timer_task, session_recorder_task},
    timer::DurationInputs,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, study={}min, break={}min, tick={}ms",
          config.host, config.port, config.study, config.break_minutes, config.tick_ms);

    // Create application state and the driver that owns the phase timer
    let durations = DurationInputs::new(config.study.clone(), config.break_minutes.clone());
    let (state, driver) = AppState::new(
        config.port,
        config.host.clone(),
        durations,
        config.tick_period(),
    );
    let blocklist = match &config.blocklist {
        Some(path) => Blocklist::load_or_create(path),
        None => Blocklist::default(),
    };
    let state = Arc::new(state.with_blocklist(blocklist));

    // Start background tasks
    let timer_task = tokio::spawn(phase_timer_task(driver));
    let notices = state.subscribe_notices();
    tokio::spawn(session_recorder_task(Arc::clone(&state), notices));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start     - Start a study phase");
    info!("  POST /stop      - Stop the timer");
    info!("  PUT  /durations - Set study/break minutes");
    info!("  GET  /status    - Current mode, display and inputs");
    info!("  GET  /sessions  - Logged study sessions");
    info!("  GET  /blocked   - Check a URL against the study blocklist");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    timer_task.abort();
    info!("Server shutdown complete");
    Ok(())
}
