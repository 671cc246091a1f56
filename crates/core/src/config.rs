// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tailer configuration
//!
//! ```toml
//! worker_id = "worker-a"
//! marker_publish_timeout = "10s"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MARKER_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors loading a tailer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one metadata tailer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TailerConfig {
    /// Worker identity, used as the prefix of generated marker origin ids
    pub worker_id: String,
    /// Upper bound on publishing the initialization marker at startup
    #[serde(with = "humantime_serde")]
    pub marker_publish_timeout: Duration,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            worker_id: "worker".to_string(),
            marker_publish_timeout: DEFAULT_MARKER_PUBLISH_TIMEOUT,
        }
    }
}

impl TailerConfig {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            ..Self::default()
        }
    }

    pub fn with_marker_publish_timeout(mut self, timeout: Duration) -> Self {
        self.marker_publish_timeout = timeout;
        self
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TailerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_id.trim().is_empty() {
            return Err(ConfigError::Invalid("worker_id must not be empty".into()));
        }
        if self.marker_publish_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "marker_publish_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
