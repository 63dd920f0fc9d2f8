//! Message types for the application (TEA pattern)

use std::sync::Arc;

use tokio::sync::watch;

use bidboard_core::{BoardNumber, BoardUpdate, Error, FetchSeq, RoundId};
use bidboard_remote::{DeclareReceipt, DeclareRequest};

use crate::signals::ShutdownSignal;
use crate::state::ViewId;
use crate::sync::TaskHandleSlot;

/// Category of a failed remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request never produced a usable answer
    Transport,
    /// Service refused with its own message
    Rejected,
    /// Answer could not be interpreted
    Malformed,
}

impl FailureKind {
    pub fn of(error: &Error) -> Self {
        match error {
            Error::Rejected { .. } => FailureKind::Rejected,
            Error::MalformedResponse { .. } | Error::Json(_) => FailureKind::Malformed,
            _ => FailureKind::Transport,
        }
    }
}

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Round Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Open the view for a round (tears down any current round)
    EnterRound { round_id: RoundId },

    /// Close the current round view
    LeaveRound,

    /// Operator asked to quit (`quit` command)
    Quit,

    /// An OS signal asked the process to stop
    Signal { signal: ShutdownSignal },

    // ─────────────────────────────────────────────────────────
    // Synchronizer
    // ─────────────────────────────────────────────────────────
    /// The polling task is running.
    ///
    /// `shutdown_tx` is wrapped in `Arc` because `watch::Sender` is not
    /// `Clone`. `task_handle` holds the task's `JoinHandle`.
    SyncStarted {
        round_id: RoundId,
        view: ViewId,
        shutdown_tx: Arc<watch::Sender<bool>>,
        task_handle: TaskHandleSlot,
    },

    /// A fetch completed
    BidsFetched {
        round_id: RoundId,
        view: ViewId,
        seq: FetchSeq,
        update: BoardUpdate,
    },

    /// A fetch failed; boards stay as they are
    BidsFetchFailed {
        round_id: RoundId,
        view: ViewId,
        seq: FetchSeq,
        error: String,
        kind: FailureKind,
    },

    // ─────────────────────────────────────────────────────────
    // Operator Input
    // ─────────────────────────────────────────────────────────
    SelectNumber { number: BoardNumber },
    ClearSelection,
    /// Ask for confirmation of the selected number
    OpenConfirm,
    /// Confirm the pending declaration
    ConfirmDeclare,
    CancelConfirm,
    /// Remove the oldest notification
    DismissNotification,

    // ─────────────────────────────────────────────────────────
    // Declarer
    // ─────────────────────────────────────────────────────────
    DeclareSucceeded {
        round_id: RoundId,
        request: DeclareRequest,
        receipt: DeclareReceipt,
    },

    DeclareFailed {
        round_id: RoundId,
        request: DeclareRequest,
        error: String,
        kind: FailureKind,
    },
}
