//! Bid Board - live bid boards and round declaration for the game operator
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing::{error, info};

use bidboard_app::config::{self, Settings};
use bidboard_core::RoundId;

/// Bid Board - follow a round's bids and declare its winning number
#[derive(Parser, Debug)]
#[command(name = "bidboard")]
#[command(about = "Live bid boards and winning-number declaration", long_about = None)]
struct Args {
    /// Round to open
    #[arg(long, value_name = "ID", required_unless_present = "init_config")]
    round: Option<String>,

    /// Config file (default: <config_dir>/bidboard/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `remote.base_url`
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args
        .config
        .or_else(config::default_config_path)
        .ok_or_else(|| eyre!("Could not determine a config directory; pass --config"))?;

    if args.init_config {
        if config_path.exists() {
            return Err(eyre!(
                "{} already exists; not overwriting",
                config_path.display()
            ));
        }
        config::save_settings(&config_path, &Settings::default())?;
        eprintln!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    bidboard_core::logging::init()?;

    let mut settings = config::load_settings(&config_path);
    config::apply_env_overrides(&mut settings);
    if let Some(base_url) = args.base_url {
        settings.remote.base_url = base_url;
    }

    let round = args
        .round
        .ok_or_else(|| eyre!("--round is required"))?;
    let round_id = RoundId::new(round)?;
    info!("Config: {}", config_path.display());

    let result = bidboard::run_headless(settings, round_id).await;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
        eprintln!("Logs: {}", bidboard_core::logging::log_directory().display());
    }
    Ok(result?)
}
