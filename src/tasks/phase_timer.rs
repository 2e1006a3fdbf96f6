//! Phase timer event loop

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::{
    error::TimerError,
    timer::{PhaseTimer, TickHandle, TickOutcome, TimerState},
};

/// Control requests forwarded to the timer task
#[derive(Debug)]
pub enum TimerCommand {
    Start {
        reply: oneshot::Sender<Result<TimerState, TimerError>>,
    },
    Stop {
        reply: oneshot::Sender<TimerState>,
    },
}

/// Everything the timer task owns: the state machine and its event inputs
pub struct TimerDriver {
    timer: PhaseTimer,
    commands: mpsc::Receiver<TimerCommand>,
    ticks: mpsc::UnboundedReceiver<TickHandle>,
    state_tx: watch::Sender<TimerState>,
}

impl TimerDriver {
    pub fn new(
        timer: PhaseTimer,
        commands: mpsc::Receiver<TimerCommand>,
        ticks: mpsc::UnboundedReceiver<TickHandle>,
        state_tx: watch::Sender<TimerState>,
    ) -> Self {
        Self {
            timer,
            commands,
            ticks,
            state_tx,
        }
    }

    fn publish(&self) {
        // send_replace never fails, even with every receiver gone
        self.state_tx.send_replace(self.timer.state());
    }

    fn handle_command(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Start { reply } => {
                let result = self.timer.start().map(|_| self.timer.state());
                if let Err(e) = &result {
                    warn!("Start rejected: {}", e);
                }
                self.publish();
                if reply.send(result).is_err() {
                    debug!("Start requester went away before the reply");
                }
            }
            TimerCommand::Stop { reply } => {
                self.timer.stop();
                self.publish();
                if reply.send(self.timer.state()).is_err() {
                    debug!("Stop requester went away before the reply");
                }
            }
        }
    }

    fn handle_tick(&mut self, handle: TickHandle) {
        match self.timer.on_tick(handle) {
            TickOutcome::Ignored => {}
            TickOutcome::Counted { .. } => self.publish(),
            TickOutcome::Transitioned { from, to } => {
                debug!("Tick moved timer from {} to {}", from, to);
                self.publish();
            }
        }
    }
}

/// Background task that serialises start, stop and tick events into the timer.
///
/// Runs until every command sender is dropped, then stops the timer.
pub async fn phase_timer_task(mut driver: TimerDriver) {
    info!("Starting phase timer task");
    driver.publish();

    loop {
        tokio::select! {
            command = driver.commands.recv() => match command {
                Some(command) => driver.handle_command(command),
                None => {
                    info!("Command channel closed, stopping phase timer");
                    driver.timer.stop();
                    driver.publish();
                    break;
                }
            },

            Some(handle) = driver.ticks.recv() => driver.handle_tick(handle),
        }
    }
}
