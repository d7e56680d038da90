//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     SWEETSHOP_API_URL=http://shop.local:3001                            │
//! │     SWEETSHOP_TIMEOUT_SECS=5                                            │
//! │     SWEETSHOP_DEMO_FALLBACK=false                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/sweetshop/client.toml (Linux)                             │
//! │     ~/Library/Application Support/com.sweetshop.sweetshop/client.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     http://localhost:3001, 10s timeout, demo fallback on                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! url = "http://localhost:3001"
//! timeout_secs = 10
//!
//! [demo]
//! fallback_enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Server root; `/health` and `/api/...` are resolved against it.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Offline demo behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    /// Switch to the built-in demo dataset when the API is unreachable at startup.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings {
            fallback_enabled: true,
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub demo: DemoSettings,
}

impl ClientConfig {
    /// Config pointing at `url` with everything else default.
    pub fn with_url(url: impl Into<String>) -> Self {
        ClientConfig {
            api: ApiSettings {
                url: url.into(),
                ..ApiSettings::default()
            },
            ..ClientConfig::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.api.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SWEETSHOP_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Ok(secs) = std::env::var("SWEETSHOP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid SWEETSHOP_TIMEOUT_SECS"),
            }
        }

        if let Ok(flag) = std::env::var("SWEETSHOP_DEMO_FALLBACK") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.demo.fallback_enabled = true,
                "0" | "false" | "no" | "off" => self.demo.fallback_enabled = false,
                _ => warn!(value = %flag, "Ignoring invalid SWEETSHOP_DEMO_FALLBACK"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sweetshop", "sweetshop")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// API root without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api.url.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
