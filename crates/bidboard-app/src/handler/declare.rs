//! Selection and declaration handlers

use bidboard_core::prelude::*;
use bidboard_core::{BoardNumber, DeclareTransition, RoundId};
use bidboard_remote::{DeclareReceipt, DeclareRequest};

use crate::declarer::DeclareBlocked;
use crate::message::FailureKind;
use crate::state::{AppState, Severity, DECLARED_MESSAGE};

use super::{UpdateAction, UpdateResult};

pub fn handle_select(state: &mut AppState, number: BoardNumber) -> UpdateResult {
    let Some(round) = state.round.as_mut() else {
        return UpdateResult::none();
    };

    if let Err(blocked) = round.declarer.select(number, &round.snapshot) {
        debug!("Ignoring selection of {}: {}", number, blocked);
    }
    UpdateResult::none()
}

pub fn handle_clear_selection(state: &mut AppState) -> UpdateResult {
    let Some(round) = state.round.as_mut() else {
        return UpdateResult::none();
    };

    if let Err(blocked) = round.declarer.clear_selection(&round.snapshot) {
        debug!("Ignoring clear: {}", blocked);
    }
    UpdateResult::none()
}

pub fn handle_open_confirm(state: &mut AppState) -> UpdateResult {
    let Some(round) = state.round.as_mut() else {
        return UpdateResult::none();
    };

    match round.declarer.open_confirm(&round.snapshot) {
        Ok(number) => {
            debug!("Confirmation requested for {} in round {}", number, round.round_id);
        }
        Err(blocked) => refuse(state, blocked),
    }
    UpdateResult::none()
}

pub fn handle_cancel_confirm(state: &mut AppState) -> UpdateResult {
    let Some(round) = state.round.as_mut() else {
        return UpdateResult::none();
    };

    if let Err(blocked) = round.declarer.cancel_confirm() {
        debug!("Ignoring cancel: {}", blocked);
    }
    UpdateResult::none()
}

/// `ConfirmPending -> Committing`; emits the single commit action.
pub fn handle_confirm(state: &mut AppState) -> UpdateResult {
    let Some(round) = state.round.as_mut() else {
        return UpdateResult::none();
    };

    match round.declarer.confirm(&round.snapshot) {
        Ok(request) => {
            info!(
                "Declaring {} (amount {}) for round {}",
                request.bid_number, request.bid_amount, round.round_id
            );
            UpdateResult::action(UpdateAction::CommitDeclare {
                round_id: round.round_id.clone(),
                request,
                cancel: None,
            })
        }
        Err(blocked) => {
            refuse(state, blocked);
            UpdateResult::none()
        }
    }
}

/// The service's winning number is authoritative, even when it differs
/// from the one requested.
pub fn handle_declare_succeeded(
    state: &mut AppState,
    round_id: RoundId,
    request: DeclareRequest,
    receipt: DeclareReceipt,
) -> UpdateResult {
    let Some(round) = state.round_mut(&round_id) else {
        debug!("Ignoring declaration result for inactive round {}", round_id);
        return UpdateResult::none();
    };

    let number = receipt.declared.unwrap_or_else(|| {
        warn!(
            "Declare response for round {} carried no number; using requested {}",
            round_id, request.bid_number
        );
        request.bid_number
    });
    if number != request.bid_number {
        info!(
            "Service declared {} for round {} (requested {})",
            number, round_id, request.bid_number
        );
    }

    if let DeclareTransition::Conflict { kept, rejected } = round.snapshot.declare(number) {
        warn!(
            "Round {} already declared with {}; ignoring {}",
            round_id, kept, rejected
        );
    }
    let winning = round.snapshot.declaration().winning_number().unwrap_or(number);
    round.declarer.mark_declared(winning);
    if round.stop_sync() {
        info!("Stopped polling round {}", round_id);
    }

    info!("Round {} declared with {}", round_id, winning);
    state.notify(Severity::Success, DECLARED_MESSAGE);
    UpdateResult::none()
}

/// Back to `Selected`; the declaration state stays as it was.
pub fn handle_declare_failed(
    state: &mut AppState,
    round_id: RoundId,
    request: DeclareRequest,
    error: String,
    kind: FailureKind,
) -> UpdateResult {
    let Some(round) = state.round_mut(&round_id) else {
        debug!("Ignoring declaration failure for inactive round {}", round_id);
        return UpdateResult::none();
    };

    round.declarer.commit_failed();
    warn!(
        "Declaring {} for round {} failed ({:?}): {}",
        request.bid_number, round_id, kind, error
    );
    state.notify(Severity::Error, error);
    UpdateResult::none()
}

fn refuse(state: &mut AppState, blocked: DeclareBlocked) {
    debug!("Declaration refused: {}", blocked);
    state.notify(Severity::Error, format!("Cannot declare: {}", blocked));
}
