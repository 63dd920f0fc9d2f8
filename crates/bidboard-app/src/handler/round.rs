//! Round view lifecycle handlers

use bidboard_core::prelude::*;
use bidboard_core::RoundId;

use crate::signals::ShutdownSignal;
use crate::state::{AppPhase, AppState};
use crate::sync::SyncState;

use super::{UpdateAction, UpdateResult};

/// Open a fresh view for `round_id` and start polling it.
///
/// Any current view is torn down first, even for the same id.
pub fn handle_enter_round(state: &mut AppState, round_id: RoundId) -> UpdateResult {
    if state.should_quit() {
        return UpdateResult::none();
    }

    if let Some(previous) = state.leave_round() {
        info!("Leaving round {} to enter {}", previous, round_id);
    }

    let round = state.open_round(round_id.clone());
    round.sync = SyncState::Polling;
    let view = round.view;

    info!("Entered round {} ({})", round_id, view);
    UpdateResult::action(UpdateAction::StartSync {
        round_id,
        view,
        interval: state.poll_interval(),
    })
}

pub fn handle_leave_round(state: &mut AppState) -> UpdateResult {
    if let Some(round_id) = state.leave_round() {
        info!("Left round {}", round_id);
    }
    UpdateResult::none()
}

pub fn handle_quit(state: &mut AppState) -> UpdateResult {
    state.leave_round();
    state.phase = AppPhase::Quitting;
    UpdateResult::none()
}

/// Quit on an OS signal, keeping the first signal seen.
pub fn handle_signal(state: &mut AppState, signal: ShutdownSignal) -> UpdateResult {
    info!("Quitting on {}", signal);
    state.shutdown_signal = state.shutdown_signal.or(Some(signal));
    handle_quit(state)
}
