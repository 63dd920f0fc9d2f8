//! Bid polling for the current round.
//!
//! The single entry point is [`spawn_bid_polling`], called from `mod.rs`'s
//! `handle_action` dispatcher for the `StartSync` action.
//!
//! **Polling strategy:**
//! - The first fetch is issued immediately, then one every `interval`
//!   (min [`MIN_POLL_INTERVAL`]). A slow response delays the next tick
//!   instead of bursting to catch up.
//! - Each fetch gets the next [`FetchSeq`], so the handler can drop a late
//!   response that would overwrite fresher boards.
//! - The loop ends by itself after a fetch reports the round as declared.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use bidboard_core::prelude::*;
use bidboard_core::{FetchSeq, RoundId};
use bidboard_remote::GameDataService;

use crate::message::{FailureKind, Message};
use crate::state::ViewId;
use crate::sync::TaskHandleSlot;

use super::wait_until_set;

/// Floor for the polling interval.
pub(super) const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Spawn the polling task for `round_id` as shown by `view`.
///
/// The shutdown channel and the task handle slot are created before the
/// spawn so both travel to the handler in `SyncStarted`, the first thing the
/// task sends. The handler owns them from then on: stopping the round flips
/// the channel and aborts the task.
///
/// The loop runs until:
/// - the round's shutdown channel is set (declared, left or replaced),
/// - the engine shutdown channel is set,
/// - a fetch reports the round as declared, or
/// - `msg_tx` is closed.
///
/// Fetch failures are logged and reported; the next tick retries.
pub(super) fn spawn_bid_polling<S>(
    round_id: RoundId,
    view: ViewId,
    interval: Duration,
    service: Arc<S>,
    msg_tx: mpsc::Sender<Message>,
    mut engine_shutdown_rx: watch::Receiver<bool>,
) where
    S: GameDataService + Send + Sync + 'static,
{
    let interval = interval.max(MIN_POLL_INTERVAL);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let task_slot: TaskHandleSlot = Arc::new(std::sync::Mutex::new(None));
    let task_slot_for_msg = task_slot.clone();

    let join_handle = tokio::spawn(async move {
        if msg_tx
            .send(Message::SyncStarted {
                round_id: round_id.clone(),
                view,
                shutdown_tx,
                task_handle: task_slot_for_msg,
            })
            .await
            .is_err()
        {
            return;
        }

        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut seq = FetchSeq::first();

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = wait_until_set(&mut shutdown_rx) => break,
                _ = wait_until_set(&mut engine_shutdown_rx) => break,
            }

            let issued = seq;
            seq = seq.next();
            trace!("Fetching bids {} for round {}", issued, round_id);

            let result = tokio::select! {
                result = service.fetch_bids(&round_id) => result,
                _ = wait_until_set(&mut shutdown_rx) => break,
                _ = wait_until_set(&mut engine_shutdown_rx) => break,
            };

            let (message, declared) = match result {
                Ok(update) => {
                    let declared = update.declared.is_some();
                    (
                        Message::BidsFetched {
                            round_id: round_id.clone(),
                            view,
                            seq: issued,
                            update,
                        },
                        declared,
                    )
                }
                Err(e) => {
                    if e.is_recoverable() {
                        debug!("Fetch {} for round {} failed: {}", issued, round_id, e);
                    } else {
                        error!("Fetch {} for round {} failed: {:?}", issued, round_id, e);
                    }
                    (
                        Message::BidsFetchFailed {
                            round_id: round_id.clone(),
                            view,
                            seq: issued,
                            error: e.user_message(),
                            kind: FailureKind::of(&e),
                        },
                        false,
                    )
                }
            };

            if msg_tx.send(message).await.is_err() {
                break;
            }
            if declared {
                debug!("Round {} is declared, polling finished", round_id);
                break;
            }
        }

        trace!("Polling task for round {} exited", round_id);
    });

    // Fill the slot before the task's first await can be observed by the handler
    match task_slot.lock() {
        Ok(mut slot) => *slot = Some(join_handle),
        Err(poisoned) => *poisoned.into_inner() = Some(join_handle),
    };
}
