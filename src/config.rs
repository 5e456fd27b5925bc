//! Configuration management for sachat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file, environment variables, and CLI
//! overrides.

use crate::cli::Cli;
use crate::error::{Result, SachatError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for sachat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Chat gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the REST gateway, including any path prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; a non-responding gateway fails after
    /// this elapses
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.merdannotfound.ru/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration, applying environment and CLI overrides
    ///
    /// A missing file is not an error; defaults apply. Override
    /// precedence, lowest to highest: file, `SACHAT_API_BASE` environment
    /// variable, `--api-base` CLI flag.
    pub fn load(path: impl AsRef<Path>, cli: &Cli) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(SachatError::Io)?;
            serde_yaml::from_str(&contents).map_err(SachatError::Yaml)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        if let Ok(base) = std::env::var("SACHAT_API_BASE") {
            if !base.is_empty() {
                config.gateway.base_url = base;
            }
        }
        if let Some(base) = &cli.api_base {
            config.gateway.base_url = base.clone();
        }

        Ok(config)
    }

    /// Validates the configuration
    ///
    /// The base URL must parse as an absolute http(s) URL and the timeout
    /// must be nonzero.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.gateway.base_url).map_err(|e| {
            SachatError::Config(format!(
                "Invalid gateway base URL '{}': {}",
                self.gateway.base_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SachatError::Config(format!(
                "Gateway base URL must be http or https, got '{}'",
                url.scheme()
            ))
            .into());
        }
        if self.gateway.timeout_seconds == 0 {
            return Err(SachatError::Config("Timeout must be nonzero".to_string()).into());
        }
        Ok(())
    }
}
