//! Application configuration management.
//!
//! Configuration is stored at `~/.config/lightpath/config.json` and holds the
//! backend origin, an optional request timeout, and the last email used to
//! log in. `LIGHTPATH_API_URL` overrides the stored origin.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "lightpath";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend origin used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides `api_base_url`
pub const API_URL_ENV: &str = "LIGHTPATH_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub last_email: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
            last_email: None,
        }
    }
}

impl Config {
    /// Build a config pointing at the given origin, all else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(url = %url, "Using backend origin from environment");
                config.api_base_url = url;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the session file and logs.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Origin with any trailing slashes removed.
    pub fn origin(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Root of the domain resources: `<origin>/api/core`
    pub fn api_root(&self) -> String {
        format!("{}/api/core", self.origin())
    }

    /// Token issuance endpoint: `<origin>/api/token/`
    pub fn token_url(&self) -> String {
        format!("{}/api/token/", self.origin())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
