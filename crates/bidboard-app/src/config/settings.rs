//! Settings loading and persistence

use std::path::{Path, PathBuf};

use bidboard_core::prelude::*;
use bidboard_remote::HttpServiceConfig;
use url::Url;

use super::types::{RemoteSettings, Settings};

const CONFIG_DIR: &str = "bidboard";
const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable overriding `remote.token`.
pub const TOKEN_ENV_VAR: &str = "BIDBOARD_TOKEN";

/// Default location: `<config_dir>/bidboard/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `config_path`.
///
/// A missing or unreadable file yields defaults; this never fails.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply `BIDBOARD_TOKEN` if set and non-empty.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_token_override(settings, std::env::var(TOKEN_ENV_VAR).ok());
}

fn apply_token_override(settings: &mut Settings, token: Option<String>) {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        debug!("Using token from {}", TOKEN_ENV_VAR);
        settings.remote.token = Some(token);
    }
}

/// Write settings as pretty TOML, creating parent directories.
pub fn save_settings(config_path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# Bid board configuration\n\n{}", content);

    // Atomic write: temp file then rename
    let temp_path = config_path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    std::fs::rename(&temp_path, config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

/// Build the HTTP client configuration from `[remote]`.
pub fn service_config(remote: &RemoteSettings) -> Result<HttpServiceConfig> {
    let base_url = Url::parse(remote.base_url.trim()).map_err(|e| {
        Error::config(format!("Invalid remote.base_url {:?}: {}", remote.base_url, e))
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "remote.base_url must be http or https, got {}",
            base_url.scheme()
        )));
    }

    Ok(HttpServiceConfig {
        base_url,
        bids_path: remote.bids_path.clone(),
        declare_path: remote.declare_path.clone(),
        round_query_param: remote.round_query_param.clone(),
        token: remote.token.clone(),
        headers: remote.headers.clone(),
        timeout: remote.request_timeout(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join("config.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[remote]
base_url = "https://games.example.com"
token = "abc"
request_timeout_ms = 2500

[sync]
poll_interval_ms = 1000
"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.remote.base_url, "https://games.example.com");
        assert_eq!(settings.remote.token.as_deref(), Some("abc"));
        assert_eq!(
            settings.remote.request_timeout(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(settings.sync.poll_interval_ms, 1000);
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "this is [not valid toml").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.remote.base_url = "https://games.example.com".to_string();
        settings
            .remote
            .headers
            .insert("ngrok-skip-browser-warning".to_string(), "true".to_string());
        settings.sync.poll_interval_ms = 4000;

        save_settings(&path, &settings).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn test_token_override() {
        let mut settings = Settings::default();
        settings.remote.token = Some("from-file".to_string());

        apply_token_override(&mut settings, Some("  ".to_string()));
        assert_eq!(settings.remote.token.as_deref(), Some("from-file"));

        apply_token_override(&mut settings, Some("from-env".to_string()));
        assert_eq!(settings.remote.token.as_deref(), Some("from-env"));
    }

    #[test]
    #[serial]
    fn test_apply_env_overrides_reads_env() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings);
        std::env::remove_var(TOKEN_ENV_VAR);

        assert_eq!(settings.remote.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_service_config_from_remote() {
        let mut remote = RemoteSettings::default();
        remote.base_url = "https://games.example.com/backend".to_string();
        remote.token = Some("tok".to_string());

        let config = service_config(&remote).unwrap();
        assert_eq!(config.base_url.host_str(), Some("games.example.com"));
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.round_query_param, "id");
    }

    #[test]
    fn test_service_config_rejects_bad_url() {
        let mut remote = RemoteSettings::default();
        remote.base_url = "not a url".to_string();
        assert!(matches!(service_config(&remote), Err(Error::Config { .. })));

        remote.base_url = "ftp://games.example.com".to_string();
        assert!(matches!(service_config(&remote), Err(Error::Config { .. })));
    }
}
