//! Synchronizer result handlers

use std::sync::Arc;

use tokio::sync::watch;

use bidboard_core::prelude::*;
use bidboard_core::{ApplyOutcome, BoardUpdate, FetchSeq, RoundId};

use crate::message::FailureKind;
use crate::state::{AppState, Severity, ViewId};
use crate::sync::{SyncHandle, SyncState, TaskHandleSlot};

use super::UpdateResult;

/// Store the polling task's handle on its round.
///
/// If the view is gone or no longer polling, the task is stopped at once.
pub fn handle_sync_started(
    state: &mut AppState,
    round_id: RoundId,
    view: ViewId,
    shutdown_tx: Arc<watch::Sender<bool>>,
    task_handle: TaskHandleSlot,
) -> UpdateResult {
    let handle = SyncHandle::new(shutdown_tx, task_handle);

    match state.round_view_mut(&round_id, view) {
        Some(round) if round.sync == SyncState::Polling => {
            debug!("Polling task attached to round {} ({})", round_id, view);
            round.sync_handle = Some(handle);
        }
        _ => {
            debug!(
                "Stopping orphaned polling task for round {} ({})",
                round_id, view
            );
            drop(handle);
        }
    }
    UpdateResult::none()
}

pub fn handle_bids_fetched(
    state: &mut AppState,
    round_id: RoundId,
    view: ViewId,
    seq: FetchSeq,
    update: BoardUpdate,
) -> UpdateResult {
    let Some(round) = state.round_view_mut(&round_id, view) else {
        debug!(
            "Ignoring bids {} for inactive round {} ({})",
            seq, round_id, view
        );
        return UpdateResult::none();
    };

    match round.snapshot.apply(seq, &update) {
        ApplyOutcome::Stale { last_applied } => {
            debug!(
                "Ignoring stale bids {} for round {} (last applied {})",
                seq, round_id, last_applied
            );
        }
        ApplyOutcome::Applied {
            newly_declared,
            skipped,
        } => {
            trace!(
                "Applied bids {} for round {} ({} entries, {} skipped)",
                seq,
                round_id,
                round.snapshot.full().len(),
                skipped
            );
            if let Some(number) = newly_declared {
                info!("Round {} was declared with {}", round_id, number);
                round.declarer.mark_declared(number);
            }
        }
    }

    if round.snapshot.declaration().is_declared() && round.stop_sync() {
        info!("Stopped polling round {}", round_id);
    }

    UpdateResult::none()
}

pub fn handle_bids_fetch_failed(
    state: &mut AppState,
    round_id: RoundId,
    view: ViewId,
    seq: FetchSeq,
    error: String,
    kind: FailureKind,
) -> UpdateResult {
    if state.round_view_mut(&round_id, view).is_none() {
        debug!(
            "Ignoring failed fetch {} for inactive round {} ({})",
            seq, round_id, view
        );
        return UpdateResult::none();
    }

    warn!(
        "Fetch {} for round {} failed ({:?}): {}",
        seq, round_id, kind, error
    );
    state.notify(Severity::Error, format!("Could not refresh bids: {}", error));
    UpdateResult::none()
}
