//! Configuration model.
//!
//! Loaded once at startup and shared read-only by every request.
//! API keys and URLs can be overridden through the environment:
//! - `RADARR_URL`, `RADARR_API_KEY`
//! - `SONARR_URL`, `SONARR_API_KEY`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SELECTION_TIMEOUT_SECS: u64 = 180;
const DEFAULT_SEASON_TIMEOUT_SECS: u64 = 120;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Movie backend.
    pub radarr: BackendConfig,
    /// Series backend.
    pub sonarr: BackendConfig,
    /// Wait windows for user signals.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Connection and defaults for one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API base URL, e.g. `http://localhost:7878/api/v3`.
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    /// Resolved from the backend at startup when absent.
    #[serde(default)]
    pub quality_profile_id: Option<u32>,
    /// Resolved from the backend at startup when absent.
    #[serde(default)]
    pub root_folder_path: Option<String>,
    /// Sonarr v3 only.
    #[serde(default)]
    pub language_profile_id: Option<u32>,
    /// Radarr only.
    #[serde(default = "default_minimum_availability")]
    pub minimum_availability: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Wait windows, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// While waiting for a candidate or a confirmation.
    #[serde(default = "default_selection_timeout")]
    pub selection_timeout_secs: u64,
    /// While waiting for a season policy.
    #[serde(default = "default_season_timeout")]
    pub season_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            selection_timeout_secs: DEFAULT_SELECTION_TIMEOUT_SECS,
            season_timeout_secs: DEFAULT_SEASON_TIMEOUT_SECS,
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_selection_timeout() -> u64 {
    DEFAULT_SELECTION_TIMEOUT_SECS
}

fn default_season_timeout() -> u64 {
    DEFAULT_SEASON_TIMEOUT_SECS
}

fn default_minimum_availability() -> String {
    "released".to_string()
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grabarr")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Parse configuration text and apply environment overrides.
pub fn parse_config(content: &str, origin: &Path) -> Result<Config> {
    let mut config: Config = toml::from_str(content).map_err(|e| Error::InvalidConfig {
        path: origin.display().to_string(),
        reason: e.to_string(),
    })?;

    apply_env(&mut config.radarr, "RADARR");
    apply_env(&mut config.sonarr, "SONARR");

    if config.radarr.api_key.is_empty() {
        return Err(Error::ConfigurationMissing(
            "radarr api_key (set it in the config file or RADARR_API_KEY)".to_string(),
        ));
    }
    if config.sonarr.api_key.is_empty() {
        return Err(Error::ConfigurationMissing(
            "sonarr api_key (set it in the config file or SONARR_API_KEY)".to_string(),
        ));
    }

    Ok(config)
}

/// Load configuration from file.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        return Err(Error::ConfigurationMissing(format!(
            "config file not found: {}",
            config_path.display()
        )));
    }

    let content = std::fs::read_to_string(&config_path)?;
    parse_config(&content, &config_path)
}

fn apply_env(backend: &mut BackendConfig, prefix: &str) {
    if let Ok(url) = std::env::var(format!("{}_URL", prefix)) {
        backend.url = url;
    }
    if let Ok(key) = std::env::var(format!("{}_API_KEY", prefix)) {
        backend.api_key = key;
    }
    backend.url = backend.url.trim_end_matches('/').to_string();
}
