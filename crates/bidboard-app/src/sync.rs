//! Synchronizer state and the handle of its polling task

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shared slot the polling task's `JoinHandle` is parked in right after spawn.
pub type TaskHandleSlot = Arc<std::sync::Mutex<Option<JoinHandle<()>>>>;

/// `Idle -> Polling -> Stopped`; `Stopped` is terminal for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Idle,
    Polling,
    Stopped,
}

/// Controls a running polling task.
///
/// Dropping the handle stops the task, so a torn-down round can never leave
/// an orphaned timer behind.
pub struct SyncHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
    /// Filled by the spawner, possibly after the handle was created.
    task_slot: TaskHandleSlot,
}

impl SyncHandle {
    pub fn new(shutdown_tx: Arc<watch::Sender<bool>>, task_slot: TaskHandleSlot) -> Self {
        Self {
            shutdown_tx,
            task_slot,
        }
    }

    /// Signal the loop to exit and abort it if it is parked on a request.
    pub fn stop(&mut self) {
        self.shutdown_tx.send_replace(true);
        let task = match self.task_slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(task) = task {
            task.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
