//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use bidboard_core::{BoardNumber, RoundId};
use bidboard_remote::DeclareRequest;

use crate::projection::{ConfirmView, RoundProjection};
use crate::selection::SelectionView;
use crate::signals::ShutdownSignal;
use crate::state::Notification;

/// Domain events emitted by the Engine for external consumers.
///
/// Events are broadcast after each message processing cycle, so subscribers
/// see a consistent view of state changes.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Round Lifecycle
    // ─────────────────────────────────────────────────────────
    /// A round view was opened
    RoundEntered { round_id: RoundId },

    /// The round view was closed
    RoundLeft { round_id: RoundId },

    // ─────────────────────────────────────────────────────────
    // Boards
    // ─────────────────────────────────────────────────────────
    /// A fetch was applied; carries the full re-projection
    BoardUpdated { projection: Box<RoundProjection> },

    /// Polling ended for the round
    SyncStopped { round_id: RoundId },

    // ─────────────────────────────────────────────────────────
    // Declaration Workflow
    // ─────────────────────────────────────────────────────────
    /// The operator's selection changed (`None` when cleared)
    SelectionChanged {
        round_id: RoundId,
        selection: Option<SelectionView>,
    },

    /// Confirmation prompt opened
    ConfirmOpened {
        round_id: RoundId,
        confirm: ConfirmView,
    },

    /// Confirmation prompt closed without committing
    ConfirmClosed { round_id: RoundId },

    /// The declaration request is on its way to the service
    DeclareStarted {
        round_id: RoundId,
        request: DeclareRequest,
    },

    /// The round is declared; final for the round
    Declared {
        round_id: RoundId,
        winning_number: BoardNumber,
    },

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────
    /// A notification was pushed
    Notification { notification: Notification },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down; `signal` is set when an OS signal caused it
    Shutdown { signal: Option<ShutdownSignal> },
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RoundEntered { .. } => "round_entered",
            Self::RoundLeft { .. } => "round_left",
            Self::BoardUpdated { .. } => "board_updated",
            Self::SyncStopped { .. } => "sync_stopped",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::ConfirmOpened { .. } => "confirm_opened",
            Self::ConfirmClosed { .. } => "confirm_closed",
            Self::DeclareStarted { .. } => "declare_started",
            Self::Declared { .. } => "declared",
            Self::Notification { .. } => "notification",
            Self::Shutdown { .. } => "shutdown",
        }
    }
}
