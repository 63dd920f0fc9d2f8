//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable controlling the log filter.
pub const LOG_ENV_VAR: &str = "BIDBOARD_LOG";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/bidboard/logs/` so that stdout stays
/// free for the NDJSON event stream.
/// Log level is controlled by the `BIDBOARD_LOG` environment variable.
///
/// # Examples
/// ```bash
/// BIDBOARD_LOG=debug bidboard --round 42
/// BIDBOARD_LOG=bidboard_app=trace bidboard --round 42
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "bidboard.log");

    // Default to info for our crates, allow override via BIDBOARD_LOG
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        EnvFilter::new("bidboard=info,bidboard_app=info,bidboard_remote=info,warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::logging(e.to_string()))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Bid board starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Directory holding the daily log files
pub fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("bidboard").join("logs")
}
