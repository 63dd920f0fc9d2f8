//! Message processing and action hydration
//!
//! Runs a message through the TEA update loop and dispatches the resulting
//! actions, filling in the parts of an action only the state can provide.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use bidboard_core::prelude::*;
use bidboard_remote::GameDataService;

use crate::message::Message;
use crate::state::AppState;
use crate::{handler, UpdateAction};

use super::actions::handle_action;

/// Process a message through the TEA update function
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    service: &Arc<S>,
    shutdown_rx: &watch::Receiver<bool>,
) where
    S: GameDataService + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            if let Some(action) = hydrate_commit_declare(action, state) {
                handle_action(action, msg_tx.clone(), service.clone(), shutdown_rx.clone());
            }
        }

        // Continue with follow-up message
        msg = result.message;
    }
}

/// Hydrate `CommitDeclare` with the teardown signal of its round, returning
/// `None` if the round is no longer on screen. In that case the action is
/// discarded and no request is sent.
///
/// All other action variants are returned unchanged.
fn hydrate_commit_declare(action: UpdateAction, state: &AppState) -> Option<UpdateAction> {
    match action {
        UpdateAction::CommitDeclare {
            round_id,
            request,
            cancel,
        } => {
            if cancel.is_some() {
                return Some(UpdateAction::CommitDeclare {
                    round_id,
                    request,
                    cancel,
                });
            }

            match state.round.as_ref().filter(|round| round.is(&round_id)) {
                Some(round) => Some(UpdateAction::CommitDeclare {
                    cancel: Some(round.teardown_signal()),
                    round_id,
                    request,
                }),
                None => {
                    debug!("Discarding declaration for inactive round {}", round_id);
                    None
                }
            }
        }
        other => Some(other),
    }
}
