//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `round`: Round view lifecycle (enter, leave, quit)
//! - `sync`: Synchronizer results (started, fetched, failed)
//! - `declare`: Selection and declaration workflow

pub(crate) mod declare;
pub(crate) mod round;
pub(crate) mod sync;
pub(crate) mod update;


use std::time::Duration;

use tokio::sync::watch;

use bidboard_core::RoundId;
use bidboard_remote::DeclareRequest;

use crate::message::Message;
use crate::state::ViewId;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Start the polling task for a round.
    ///
    /// The task fetches immediately, then every `interval`, and exits on its
    /// own once a fetch reports the round as declared.
    StartSync {
        round_id: RoundId,
        view: ViewId,
        interval: Duration,
    },

    /// Send the declaration to the service.
    ///
    /// `cancel` is `None` when returned by `handler::update()` and hydrated by
    /// `process.rs` with the round's teardown signal before dispatch. If the
    /// round is gone by then the action is discarded.
    CommitDeclare {
        round_id: RoundId,
        request: DeclareRequest,
        cancel: Option<watch::Receiver<bool>>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
