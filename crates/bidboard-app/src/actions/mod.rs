//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::warn;

use bidboard_remote::GameDataService;

use crate::message::Message;
use crate::UpdateAction;

pub(super) mod declare;
pub(super) mod sync;

/// Execute an action by spawning a background task
pub fn handle_action<S>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    service: Arc<S>,
    shutdown_rx: watch::Receiver<bool>,
) where
    S: GameDataService + Send + Sync + 'static,
{
    match action {
        UpdateAction::StartSync {
            round_id,
            view,
            interval,
        } => {
            sync::spawn_bid_polling(round_id, view, interval, service, msg_tx, shutdown_rx);
        }

        UpdateAction::CommitDeclare {
            round_id,
            request,
            cancel,
        } => {
            let Some(cancel) = cancel else {
                warn!(
                    "CommitDeclare for round {} reached dispatch without a cancel signal",
                    round_id
                );
                return;
            };
            declare::spawn_declare_commit(round_id, request, service, msg_tx, cancel, shutdown_rx);
        }
    }
}

/// Resolves once `rx` holds `true` or its sender is gone.
pub(crate) async fn wait_until_set(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stopped| *stopped).await;
}
