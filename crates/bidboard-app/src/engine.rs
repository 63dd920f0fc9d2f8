//! Engine - shared orchestration state for the bid board runners
//!
//! The Engine owns the TEA state, the message channel, the shutdown signal
//! and the game-data service. Runners feed it messages and subscribe to the
//! [`EngineEvent`]s it derives from state changes.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};

use bidboard_core::prelude::*;
use bidboard_core::{BoardNumber, DeclarationState, FetchSeq, RoundId};
use bidboard_remote::GameDataService;

use crate::config::Settings;
use crate::declarer::DeclarerPhase;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::projection::{self, RoundProjection};
use crate::signals;
use crate::state::{AppState, RoundView, ViewId};
use crate::sync::SyncState;

/// Capacity of the message and event channels
const CHANNEL_CAPACITY: usize = 256;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, Default)]
struct StateSnapshot {
    round_id: Option<RoundId>,
    /// Differs between two views of the same round id
    view: Option<ViewId>,
    last_applied: Option<FetchSeq>,
    declaration: DeclarationState,
    phase: DeclarerPhase,
    chosen: Option<BoardNumber>,
    sync: SyncState,
    last_notification_id: u64,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        let last_notification_id = state.last_notification_id();
        match state.round.as_ref() {
            Some(round) => Self {
                round_id: Some(round.round_id.clone()),
                view: Some(round.view),
                last_applied: round.snapshot.last_applied(),
                declaration: round.snapshot.declaration(),
                phase: round.declarer.phase(),
                chosen: round.declarer.selection().chosen(),
                sync: round.sync,
                last_notification_id,
            },
            None => Self {
                last_notification_id,
                ..Self::default()
            },
        }
    }

    /// Baseline for a round that was not on screen before this cycle.
    fn fresh_round(&self) -> Self {
        Self {
            last_notification_id: self.last_notification_id,
            ..Self::default()
        }
    }
}

/// Orchestration engine for the bid board.
///
/// Encapsulates all shared state between runners:
/// - TEA state management
/// - Message channel
/// - Shutdown signaling
/// - The game-data service used by background tasks
/// - Event broadcasting for external consumers
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin reader).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The runner's event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    service: Arc<S>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S> Engine<S>
where
    S: GameDataService + Send + Sync + 'static,
{
    /// Create a new Engine.
    ///
    /// Must be called from within a tokio runtime: the OS signal handler is
    /// spawned here.
    pub fn new(settings: Settings, service: Arc<S>) -> Self {
        let state = AppState::with_settings(settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        signals::spawn_signal_handler(msg_tx.clone());

        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            service,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// Returns a receiver that gets EngineEvents after each message
    /// processing cycle. Multiple subscribers are supported.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Delegates to `process::process_message()` which runs handler::update()
    /// and dispatches any resulting UpdateActions. Emits EngineEvents based
    /// on state changes detected by comparing before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.service,
            &self.shutdown_rx,
        );

        let post = StateSnapshot::capture(&self.state);

        self.emit_events(&pre, &post);
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Render-ready view of the current round.
    pub fn projection(&self) -> Option<RoundProjection> {
        self.state.round.as_ref().map(projection::project)
    }

    /// Initiate shutdown: tear down the round view and signal background tasks.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown {
            signal: self.state.shutdown_signal,
        });

        if let Some(round_id) = self.state.leave_round() {
            info!("Round {} closed on shutdown", round_id);
        }

        self.shutdown_tx.send_replace(true);
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let same_round = pre.round_id == post.round_id && pre.view == post.view;

        if !same_round {
            if let Some(round_id) = &pre.round_id {
                self.emit(EngineEvent::RoundLeft {
                    round_id: round_id.clone(),
                });
            }
            if let Some(round_id) = &post.round_id {
                self.emit(EngineEvent::RoundEntered {
                    round_id: round_id.clone(),
                });
            }
        }

        if let (Some(round_id), Some(round)) = (&post.round_id, self.state.round.as_ref()) {
            let baseline = if same_round {
                pre.clone()
            } else {
                pre.fresh_round()
            };
            self.emit_round_events(round_id, round, &baseline, post);
        }

        for notification in self
            .state
            .notifications
            .iter()
            .filter(|n| n.id > pre.last_notification_id)
        {
            self.emit(EngineEvent::Notification {
                notification: notification.clone(),
            });
        }
    }

    fn emit_round_events(
        &self,
        round_id: &RoundId,
        round: &RoundView,
        pre: &StateSnapshot,
        post: &StateSnapshot,
    ) {
        if pre.last_applied != post.last_applied {
            self.emit(EngineEvent::BoardUpdated {
                projection: Box::new(projection::project(round)),
            });
        }

        if pre.chosen != post.chosen {
            self.emit(EngineEvent::SelectionChanged {
                round_id: round_id.clone(),
                selection: round.declarer.selection().project(&round.snapshot),
            });
        }

        if pre.phase != post.phase {
            match post.phase {
                DeclarerPhase::ConfirmPending => {
                    if let Some(confirm) = projection::project(round).confirm {
                        self.emit(EngineEvent::ConfirmOpened {
                            round_id: round_id.clone(),
                            confirm,
                        });
                    }
                }
                DeclarerPhase::Committing(request) => {
                    self.emit(EngineEvent::DeclareStarted {
                        round_id: round_id.clone(),
                        request,
                    });
                }
                // Any exit from the prompt other than committing closes it
                _ if pre.phase == DeclarerPhase::ConfirmPending => {
                    self.emit(EngineEvent::ConfirmClosed {
                        round_id: round_id.clone(),
                    });
                }
                _ => {}
            }
        }

        if pre.declaration.is_open() {
            if let Some(winning_number) = post.declaration.winning_number() {
                self.emit(EngineEvent::Declared {
                    round_id: round_id.clone(),
                    winning_number,
                });
            }
        }

        if pre.sync != SyncState::Stopped && post.sync == SyncState::Stopped {
            self.emit(EngineEvent::SyncStopped {
                round_id: round_id.clone(),
            });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers, which is fine.
    fn emit(&self, event: EngineEvent) {
        trace!("Engine event: {}", event.event_type());
        let _ = self.event_tx.send(event);
    }
}
