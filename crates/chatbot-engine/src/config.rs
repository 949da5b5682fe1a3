//! Client configuration.
//!
//! Settings are layered: an optional JSON file, then `CHATBOT_*` environment
//! variables, then whatever the caller overrides (CLI flags).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_VAR: &str = "CHATBOT_BACKEND_URL";

/// Environment variable holding the request timeout in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "CHATBOT_REQUEST_TIMEOUT_SECS";

/// Main configuration for the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend, e.g. `http://localhost:5000`.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("0".into()));
        }
        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults, then apply
    /// the process environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `CHATBOT_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using a custom variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_VAR).filter(|u| !u.trim().is_empty()) {
            self.backend_url = Some(url);
        }
        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            // Zero is rejected along with anything non-numeric.
            self.request_timeout_secs = raw
                .trim()
                .parse()
                .ok()
                .filter(|&secs: &u64| secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        Ok(())
    }

    /// The backend base URL without trailing slashes.
    pub fn base_url(&self) -> Result<String, ConfigError> {
        let url = self
            .backend_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;
        Ok(url.trim_end_matches('/').to_string())
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Timeout was not a positive whole number of seconds.
    #[error("Invalid request timeout: {0:?}")]
    InvalidTimeout(String),

    /// No backend URL in file, environment, or flags.
    #[error("No backend URL configured (set {BACKEND_URL_VAR} or pass --backend-url)")]
    MissingBackendUrl,
}
