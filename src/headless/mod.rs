//! Headless mode - NDJSON event stream for operator tooling
//!
//! The bid board has no graphical surface of its own. The headless runner is
//! the presentation boundary: it reads operator commands from stdin and writes
//! one JSON object per line to stdout.
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type, along with
//! event-specific data and a millisecond `timestamp`.
//!
//! # Example Output
//!
//! ```json
//! {"event":"round_entered","round_id":"42","timestamp":1704700001000}
//! {"event":"selection","round_id":"42","selection":{"number":45,"amount":10,...},"timestamp":1704700002000}
//! {"event":"declared","round_id":"42","winning_number":45,"timestamp":1704700003000}
//! ```

pub mod commands;
pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use bidboard_app::projection::RoundProjection;
use bidboard_app::selection::SelectionView;
use bidboard_app::signals::ShutdownSignal;
use bidboard_app::state::Severity;
use bidboard_app::EngineEvent;
use bidboard_core::{Amount, BoardNumber, RoundId};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    RoundEntered {
        round_id: RoundId,
        timestamp: i64,
    },

    RoundLeft {
        round_id: RoundId,
        timestamp: i64,
    },

    /// Full re-projection of the round (after a fetch, or on request)
    Board {
        board: Box<RoundProjection>,
        timestamp: i64,
    },

    Selection {
        round_id: RoundId,
        selection: Option<SelectionView>,
        timestamp: i64,
    },

    ConfirmOpened {
        round_id: RoundId,
        number: BoardNumber,
        amount: Amount,
        timestamp: i64,
    },

    ConfirmClosed {
        round_id: RoundId,
        timestamp: i64,
    },

    DeclareStarted {
        round_id: RoundId,
        number: BoardNumber,
        amount: Amount,
        timestamp: i64,
    },

    Declared {
        round_id: RoundId,
        winning_number: BoardNumber,
        timestamp: i64,
    },

    SyncStopped {
        round_id: RoundId,
        timestamp: i64,
    },

    Notification {
        id: u64,
        severity: Severity,
        message: String,
        timestamp: i64,
    },

    /// Bad operator input or a fatal runner error
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown {
        #[serde(skip_serializing_if = "Option::is_none")]
        signal: Option<ShutdownSignal>,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn board(projection: RoundProjection) -> Self {
        Self::Board {
            board: Box::new(projection),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event into its NDJSON form.
    pub fn from_engine_event(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::RoundEntered { round_id } => Self::RoundEntered {
                round_id,
                timestamp,
            },
            EngineEvent::RoundLeft { round_id } => Self::RoundLeft {
                round_id,
                timestamp,
            },
            EngineEvent::BoardUpdated { projection } => Self::Board {
                board: projection,
                timestamp,
            },
            EngineEvent::SyncStopped { round_id } => Self::SyncStopped {
                round_id,
                timestamp,
            },
            EngineEvent::SelectionChanged {
                round_id,
                selection,
            } => Self::Selection {
                round_id,
                selection,
                timestamp,
            },
            EngineEvent::ConfirmOpened { round_id, confirm } => Self::ConfirmOpened {
                round_id,
                number: confirm.number,
                amount: confirm.amount,
                timestamp,
            },
            EngineEvent::ConfirmClosed { round_id } => Self::ConfirmClosed {
                round_id,
                timestamp,
            },
            EngineEvent::DeclareStarted { round_id, request } => Self::DeclareStarted {
                round_id,
                number: request.bid_number,
                amount: request.bid_amount,
                timestamp,
            },
            EngineEvent::Declared {
                round_id,
                winning_number,
            } => Self::Declared {
                round_id,
                winning_number,
                timestamp,
            },
            EngineEvent::Notification { notification } => Self::Notification {
                id: notification.id,
                severity: notification.severity,
                message: notification.message,
                timestamp,
            },
            EngineEvent::Shutdown { signal } => Self::Shutdown { signal, timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidboard_app::projection::ConfirmView;
    use bidboard_app::state::Notification;
    use serde_json::Value;

    fn round_id() -> RoundId {
        RoundId::new("42").unwrap()
    }

    fn to_json(event: &HeadlessEvent) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn test_declared_event_shape() {
        let event = HeadlessEvent::from_engine_event(EngineEvent::Declared {
            round_id: round_id(),
            winning_number: BoardNumber::new(0).unwrap(),
        });
        let json = to_json(&event);

        assert_eq!(json["event"], "declared");
        assert_eq!(json["round_id"], "42");
        assert_eq!(json["winning_number"], 0);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_confirm_opened_flattens_view() {
        let event = HeadlessEvent::from_engine_event(EngineEvent::ConfirmOpened {
            round_id: round_id(),
            confirm: ConfirmView {
                number: BoardNumber::new(45).unwrap(),
                amount: Amount::new(10),
            },
        });
        let json = to_json(&event);

        assert_eq!(json["event"], "confirm_opened");
        assert_eq!(json["number"], 45);
        assert_eq!(json["amount"], 10);
    }

    #[test]
    fn test_notification_event_shape() {
        let event = HeadlessEvent::from_engine_event(EngineEvent::Notification {
            notification: Notification {
                id: 7,
                severity: Severity::Error,
                message: "Could not refresh bids: timed out".to_string(),
            },
        });
        let json = to_json(&event);

        assert_eq!(json["event"], "notification");
        assert_eq!(json["id"], 7);
        assert_eq!(json["severity"], "error");
    }

    #[test]
    fn test_shutdown_event_names_signal() {
        let json = to_json(&HeadlessEvent::from_engine_event(EngineEvent::Shutdown {
            signal: Some(ShutdownSignal::Sigterm),
        }));
        assert_eq!(json["event"], "shutdown");
        assert_eq!(json["signal"], "sigterm");

        let json = to_json(&HeadlessEvent::from_engine_event(EngineEvent::Shutdown {
            signal: None,
        }));
        assert!(json.get("signal").is_none());
    }

    #[test]
    fn test_error_event_shape() {
        let json = to_json(&HeadlessEvent::error("unknown command: foo", false));
        assert_eq!(json["event"], "error");
        assert_eq!(json["fatal"], false);
    }
}
