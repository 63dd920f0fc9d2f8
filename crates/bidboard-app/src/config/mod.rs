//! Configuration file parsing for the bid board
//!
//! Supports `<config_dir>/bidboard/config.toml` (or an explicit path) with
//! `BIDBOARD_TOKEN` overriding the stored credential.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_path, load_settings, save_settings, service_config,
    TOKEN_ENV_VAR,
};
pub use types::*;
