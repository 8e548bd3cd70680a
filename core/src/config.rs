//! Client configuration
//!
//! Defaults, overridden by an optional JSON file, then by `PAGESIM_*`
//! environment variables; the console applies its flags last.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::playback::Speed;

/// Environment variable overriding [`ClientConfig::base_url`]
pub const ENV_BASE_URL: &str = "PAGESIM_BASE_URL";
/// Environment variable overriding [`ClientConfig::random_length`]
pub const ENV_RANDOM_LENGTH: &str = "PAGESIM_RANDOM_LENGTH";
/// Environment variable overriding [`ClientConfig::default_speed`]
pub const ENV_SPEED: &str = "PAGESIM_SPEED";

/// Configuration for the visualizer client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the computation service
    pub base_url: String,

    /// Length of generated random reference strings
    pub random_length: usize,

    /// Playback speed used until the user picks another
    pub default_speed: Speed,

    /// Per-request timeout; `None` waits on the transport indefinitely
    pub request_timeout_secs: Option<u64>,

    /// Colored terminal output
    pub color: bool,

    /// Default destination for exported comparison graphs
    pub graph_export_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            random_length: 15,
            default_speed: Speed::Medium,
            request_timeout_secs: None,
            color: true,
            graph_export_path: PathBuf::from("page_fault_comparison.png"),
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file; absent keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `PAGESIM_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(length) = lookup(ENV_RANDOM_LENGTH) {
            self.random_length = length.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_RANDOM_LENGTH.to_string(),
                value: length.clone(),
            })?;
        }
        if let Some(speed) = lookup(ENV_SPEED) {
            self.default_speed = speed.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SPEED.to_string(),
                value: speed.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if self.random_length == 0 {
            return Err(ConfigError::Invalid("random_length must be at least 1".into()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
