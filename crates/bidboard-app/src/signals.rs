//! OS signals that stop the bid board
//!
//! The listener turns the first signal into [`Message::Signal`]; the handler
//! records it so the shutdown event can say what ended the run.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

use bidboard_core::prelude::*;

use crate::message::Message;

/// Signal that asked the process to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownSignal {
    /// SIGINT, or Ctrl+C on Windows
    Sigint,
    Sigterm,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Sigint => f.write_str("SIGINT"),
            ShutdownSignal::Sigterm => f.write_str("SIGTERM"),
        }
    }
}

/// Spawn the listener; it sends one [`Message::Signal`] and exits.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                info!("Received {}", signal);
                let _ = tx.send(Message::Signal { signal }).await;
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| Error::signal(format!("cannot listen for SIGINT: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::signal(format!("cannot listen for SIGTERM: {e}")))?;

    let signal = tokio::select! {
        _ = sigint.recv() => ShutdownSignal::Sigint,
        _ = sigterm.recv() => ShutdownSignal::Sigterm,
    };
    Ok(signal)
}

#[cfg(windows)]
async fn wait_for_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::signal(format!("cannot listen for Ctrl+C: {e}")))?;
    Ok(ShutdownSignal::Sigint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_stays_quiet_without_signal() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);

        spawn_signal_handler(tx);
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(ShutdownSignal::Sigterm.to_string(), "SIGTERM");
        assert_eq!(
            serde_json::to_value(ShutdownSignal::Sigint).unwrap(),
            serde_json::json!("sigint")
        );
    }
}
