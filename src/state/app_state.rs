//! Main application state management

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};
use chrono::{DateTime, Local, Utc};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::info;

use crate::{
    error::{DurationField, TimerError},
    tasks::{TimerCommand, TimerDriver},
    timer::{
        BroadcastNotifier, DisplayText, DurationInputs, Notice, PhaseTimer, RawDurations,
        SharedDisplay, TimerMode, TimerState, TokioTicks,
    },
};
use super::{Blocklist, SessionLog, SessionRecord, SessionStats};

/// Shared handle to the running timer, its inputs and the session log
#[derive(Debug)]
pub struct AppState {
    /// Commands for the phase timer task
    command_tx: mpsc::Sender<TimerCommand>,
    /// Latest timer snapshot published by the timer task
    timer_state_rx: watch::Receiver<TimerState>,
    /// Phase completion notices
    notice_tx: broadcast::Sender<Notice>,
    /// Display text and duration inputs shared with the timer
    pub display: SharedDisplay,
    pub durations: DurationInputs,
    /// Completed study sessions and the most recent notice
    pub sessions: Arc<Mutex<SessionLog>>,
    pub last_notice: Arc<Mutex<Option<Notice>>>,
    /// Sites blocked while studying
    pub blocklist: Blocklist,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the shared state and the driver that owns the phase timer.
    ///
    /// The driver must be handed to `phase_timer_task` for commands to be served.
    pub fn new(
        port: u16,
        host: String,
        durations: DurationInputs,
        tick_period: Duration,
    ) -> (Self, TimerDriver) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (timer_state_tx, timer_state_rx) = watch::channel(TimerState::idle());
        let (notice_tx, _) = broadcast::channel(16);
        let display = SharedDisplay::new();

        let timer = PhaseTimer::new(
            Box::new(display.clone()),
            Box::new(BroadcastNotifier::new(notice_tx.clone())),
            Arc::new(durations.clone()),
            Box::new(TokioTicks::new(tick_tx)),
        )
        .with_tick_period(tick_period);

        let driver = TimerDriver::new(timer, command_rx, tick_rx, timer_state_tx);

        let state = Self {
            command_tx,
            timer_state_rx,
            notice_tx,
            display,
            durations,
            sessions: Arc::new(Mutex::new(SessionLog::new())),
            last_notice: Arc::new(Mutex::new(None)),
            blocklist: Blocklist::default(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        };

        (state, driver)
    }

    /// Replace the default blocklist
    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    /// Whether `url` is blocked right now. Only study phases block.
    pub fn is_blocked(&self, url: &str) -> bool {
        self.get_timer_state().mode == TimerMode::Study && self.blocklist.matches(url)
    }

    /// Start a fresh study phase
    pub async fn start_timer(&self) -> Result<TimerState, TimerError> {
        info!("Start requested");
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(TimerCommand::Start { reply })
            .await
            .map_err(|_| TimerError::TimerUnavailable)?;
        let result = rx.await.map_err(|_| TimerError::TimerUnavailable)?;

        if result.is_ok() {
            self.record_action("start");
        }
        result
    }

    /// Stop the timer and return to Idle
    pub async fn stop_timer(&self) -> Result<TimerState, TimerError> {
        info!("Stop requested");
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(TimerCommand::Stop { reply })
            .await
            .map_err(|_| TimerError::TimerUnavailable)?;
        let state = rx.await.map_err(|_| TimerError::TimerUnavailable)?;

        self.record_action("stop");
        Ok(state)
    }

    /// Overwrite one raw duration input. Takes effect at the next phase start.
    pub fn set_duration(&self, field: DurationField, value: String) {
        info!("Setting {} input to {:?}", field, value);
        self.durations.set(field, value);
        self.record_action(match field {
            DurationField::Study => "set-study",
            DurationField::Break => "set-break",
        });
    }

    pub fn get_durations(&self) -> RawDurations {
        self.durations.snapshot()
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> TimerState {
        *self.timer_state_rx.borrow()
    }

    /// Watch timer state updates
    pub fn watch_timer_state(&self) -> watch::Receiver<TimerState> {
        self.timer_state_rx.clone()
    }

    /// Get what the display currently shows
    pub fn get_display(&self) -> DisplayText {
        self.display.current()
    }

    /// Subscribe to phase completion notices
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    /// Remember a notice and log the session if a study phase finished
    pub fn record_notice(&self, notice: Notice) {
        if notice.completed == TimerMode::Study {
            let record = SessionRecord {
                date: notice.timestamp.with_timezone(&Local).date_naive(),
                study_minutes: notice.completed_minutes,
                break_minutes: notice.next_minutes.unwrap_or(0),
            };
            self.sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(record);
        }

        *self.last_notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice);
    }

    pub fn get_last_notice(&self) -> Option<Notice> {
        self.last_notice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn session_records(&self) -> Vec<SessionRecord> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records()
            .to_vec()
    }

    pub fn session_stats(&self) -> SessionStats {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let last_action_time = *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        *self.last_action.lock().unwrap_or_else(PoisonError::into_inner) = Some(action.to_string());
        *self
            .last_action_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    }
}
