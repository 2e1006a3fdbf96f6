//! Recurring tick sources

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Identifies one recurring tick source. Every tick carries the handle that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can start and cancel recurring ticks
pub trait TickSource: Send {
    /// Begin ticking every `period`, first tick one period from now
    fn begin(&mut self, period: Duration) -> TickHandle;

    /// Stop the given source. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Tick source backed by `tokio::time::interval`.
///
/// Each active source is a spawned task that pushes its handle into `tx` once
/// per period. Must be used from inside a Tokio runtime.
#[derive(Debug)]
pub struct TokioTicks {
    tx: mpsc::UnboundedSender<TickHandle>,
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioTicks {
    pub fn new(tx: mpsc::UnboundedSender<TickHandle>) -> Self {
        Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Number of tick tasks still running
    pub fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl TickSource for TokioTicks {
    fn begin(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        debug!("Tick source {} started ({:?} period)", handle.id(), period);
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!("Tick source {} cancelled", handle.id());
        }
    }
}

impl Drop for TokioTicks {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
