//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{declare, round, sync, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // Round Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::EnterRound { round_id } => round::handle_enter_round(state, round_id),
        Message::LeaveRound => round::handle_leave_round(state),
        Message::Quit => round::handle_quit(state),
        Message::Signal { signal } => round::handle_signal(state, signal),

        // ─────────────────────────────────────────────────────────
        // Synchronizer
        // ─────────────────────────────────────────────────────────
        Message::SyncStarted {
            round_id,
            view,
            shutdown_tx,
            task_handle,
        } => sync::handle_sync_started(state, round_id, view, shutdown_tx, task_handle),

        Message::BidsFetched {
            round_id,
            view,
            seq,
            update,
        } => sync::handle_bids_fetched(state, round_id, view, seq, update),

        Message::BidsFetchFailed {
            round_id,
            view,
            seq,
            error,
            kind,
        } => sync::handle_bids_fetch_failed(state, round_id, view, seq, error, kind),

        // ─────────────────────────────────────────────────────────
        // Operator Input
        // ─────────────────────────────────────────────────────────
        Message::SelectNumber { number } => declare::handle_select(state, number),
        Message::ClearSelection => declare::handle_clear_selection(state),
        Message::OpenConfirm => declare::handle_open_confirm(state),
        Message::ConfirmDeclare => declare::handle_confirm(state),
        Message::CancelConfirm => declare::handle_cancel_confirm(state),

        Message::DismissNotification => {
            state.dismiss_notification();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Declarer
        // ─────────────────────────────────────────────────────────
        Message::DeclareSucceeded {
            round_id,
            request,
            receipt,
        } => declare::handle_declare_succeeded(state, round_id, request, receipt),

        Message::DeclareFailed {
            round_id,
            request,
            error,
            kind,
        } => declare::handle_declare_failed(state, round_id, request, error, kind),
    }
}
