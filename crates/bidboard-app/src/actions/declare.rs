//! Declaration commit task

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use bidboard_core::prelude::*;
use bidboard_core::RoundId;
use bidboard_remote::{DeclareRequest, GameDataService};

use crate::message::{FailureKind, Message};

use super::wait_until_set;

/// Send `request` to the service and report the outcome.
///
/// If the round is torn down or the engine shuts down first, the request
/// future is dropped and nothing is reported.
pub(super) fn spawn_declare_commit<S>(
    round_id: RoundId,
    request: DeclareRequest,
    service: Arc<S>,
    msg_tx: mpsc::Sender<Message>,
    mut cancel: watch::Receiver<bool>,
    mut engine_shutdown_rx: watch::Receiver<bool>,
) where
    S: GameDataService + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = tokio::select! {
            result = service.declare(&round_id, request) => result,
            _ = wait_until_set(&mut cancel) => {
                debug!("Declaration for round {} cancelled by teardown", round_id);
                return;
            }
            _ = wait_until_set(&mut engine_shutdown_rx) => {
                debug!("Declaration for round {} cancelled by shutdown", round_id);
                return;
            }
        };

        let message = match result {
            Ok(receipt) => Message::DeclareSucceeded {
                round_id,
                request,
                receipt,
            },
            Err(e) => Message::DeclareFailed {
                round_id,
                request,
                error: e.user_message(),
                kind: FailureKind::of(&e),
            },
        };

        let _ = msg_tx.send(message).await;
    });
}
