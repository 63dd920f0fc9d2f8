//! Application state (Model in TEA pattern)

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use bidboard_core::{BoardSnapshot, RoundId};

use crate::config::Settings;
use crate::declarer::Declarer;
use crate::signals::ShutdownSignal;
use crate::sync::{SyncHandle, SyncState};

/// Notifications kept before the oldest is dropped
pub const MAX_NOTIFICATIONS: usize = 32;

/// Operator-facing message text after a successful declaration
pub const DECLARED_MESSAGE: &str = "Bid declared successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// A non-blocking operator notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Monotonic id, unique within the process
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// Identity of one round view; unique within the process.
///
/// Re-entering a round creates a new view with a new id, so results from
/// the previous view's tasks can be told apart even for the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Everything owned by the view of one round.
///
/// Dropping a `RoundView` stops its polling task and cancels an in-flight
/// declaration.
#[derive(Debug)]
pub struct RoundView {
    pub round_id: RoundId,
    pub view: ViewId,
    pub snapshot: BoardSnapshot,
    pub declarer: Declarer,
    pub sync: SyncState,
    pub sync_handle: Option<SyncHandle>,
    /// Flipped to `true` on teardown; commit tasks watch it.
    teardown_tx: watch::Sender<bool>,
}

impl RoundView {
    pub fn new(round_id: RoundId) -> Self {
        Self::with_view(round_id, ViewId::default())
    }

    pub fn with_view(round_id: RoundId, view: ViewId) -> Self {
        let (teardown_tx, _) = watch::channel(false);
        Self {
            round_id,
            view,
            snapshot: BoardSnapshot::new(),
            declarer: Declarer::new(),
            sync: SyncState::Idle,
            sync_handle: None,
            teardown_tx,
        }
    }

    pub fn is(&self, round_id: &RoundId) -> bool {
        &self.round_id == round_id
    }

    /// Receiver that fires when this view is torn down.
    pub fn teardown_signal(&self) -> watch::Receiver<bool> {
        self.teardown_tx.subscribe()
    }

    /// Stop polling for good. Returns whether polling was active.
    pub fn stop_sync(&mut self) -> bool {
        if let Some(mut handle) = self.sync_handle.take() {
            handle.stop();
        }
        let was_polling = self.sync == SyncState::Polling;
        self.sync = SyncState::Stopped;
        was_polling
    }

    /// Release every background resource of the view.
    pub fn teardown(&mut self) {
        self.stop_sync();
        self.teardown_tx.send_replace(true);
    }
}

impl Drop for RoundView {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub settings: Settings,
    /// The round currently on screen
    pub round: Option<RoundView>,
    pub notifications: VecDeque<Notification>,
    /// Set when an OS signal caused the quit
    pub shutdown_signal: Option<ShutdownSignal>,
    next_notification_id: u64,
    last_view: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: AppPhase::Running,
            settings,
            round: None,
            notifications: VecDeque::new(),
            shutdown_signal: None,
            next_notification_id: 1,
            last_view: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn poll_interval(&self) -> Duration {
        self.settings.sync.poll_interval()
    }

    /// The current round, if it is `round_id`.
    pub fn round_mut(&mut self, round_id: &RoundId) -> Option<&mut RoundView> {
        self.round.as_mut().filter(|round| round.is(round_id))
    }

    /// The current round, if it is `round_id` shown by `view`.
    pub fn round_view_mut(&mut self, round_id: &RoundId, view: ViewId) -> Option<&mut RoundView> {
        self.round_mut(round_id).filter(|round| round.view == view)
    }

    /// Install a fresh view for `round_id`. The caller tears down the old one.
    pub fn open_round(&mut self, round_id: RoundId) -> &mut RoundView {
        self.last_view += 1;
        self.round.insert(RoundView::with_view(round_id, ViewId(self.last_view)))
    }

    /// Tear down and remove the current round.
    pub fn leave_round(&mut self) -> Option<RoundId> {
        self.round.take().map(|mut round| {
            round.teardown();
            round.round_id.clone()
        })
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            id: self.next_notification_id,
            severity,
            message: message.into(),
        };
        self.next_notification_id += 1;

        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    pub fn dismiss_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    /// Id of the most recent notification ever pushed (0 if none).
    pub fn last_notification_id(&self) -> u64 {
        self.next_notification_id - 1
    }
}
