//! Configuration types for the bid board
//!
//! Defines:
//! - `Settings` - Top-level settings (`config.toml`)
//! - `RemoteSettings` - Game-data service endpoint and credentials
//! - `SyncSettings` - Board polling cadence

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lower bound for the poll interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 500;

/// Application settings (`<config_dir>/bidboard/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub sync: SyncSettings,
}

/// Remote game-data service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteSettings {
    /// Service root, e.g. `https://games.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the bids endpoint (GET)
    #[serde(default = "default_bids_path")]
    pub bids_path: String,

    /// Path of the declare endpoint (PUT)
    #[serde(default = "default_declare_path")]
    pub declare_path: String,

    /// Query parameter carrying the round id
    #[serde(default = "default_round_query_param")]
    pub round_query_param: String,

    /// Bearer credential. `BIDBOARD_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout; unset leaves the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bids_path: default_bids_path(),
            declare_path: default_declare_path(),
            round_query_param: default_round_query_param(),
            token: None,
            request_timeout_ms: None,
            headers: BTreeMap::new(),
        }
    }
}

impl RemoteSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Board synchronization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncSettings {
    /// Poll interval in milliseconds (minimum 500ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl SyncSettings {
    /// Poll interval, clamped to [`MIN_POLL_INTERVAL_MS`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_bids_path() -> String {
    "/api/web/retrieve/bids".to_string()
}

fn default_declare_path() -> String {
    "/api/web/update/gameResult".to_string()
}

fn default_round_query_param() -> String {
    "id".to_string()
}

fn default_poll_interval_ms() -> u64 {
    3000
}
