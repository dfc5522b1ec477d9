//! Configuration management for Palaver
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{PalaverError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Palaver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session token persistence settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout (seconds)
    ///
    /// Unset by default: a request that never settles leaves the caller
    /// waiting.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

/// Session token persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Which backend holds the access token
    #[serde(default)]
    pub store: TokenStoreKind,

    /// Override for the file backend's token path
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

/// Token store backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenStoreKind {
    /// Plain file in the user's data directory
    #[default]
    File,
    /// OS native credential store
    Keyring,
    /// Process-local; forgotten on exit
    Memory,
}

impl TokenStoreKind {
    fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(Self::File),
            "keyring" => Some(Self::Keyring),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PalaverError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| PalaverError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("PALAVER_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: PALAVER_BASE_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("PALAVER_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid PALAVER_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(store) = std::env::var("PALAVER_TOKEN_STORE") {
            match TokenStoreKind::parse_str(&store) {
                Some(kind) => self.session.store = kind,
                None => tracing::warn!("Invalid token store: {}, keeping configured value", store),
            }
        }

        if let Ok(token_path) = std::env::var("PALAVER_TOKEN_PATH") {
            self.session.token_path = Some(PathBuf::from(token_path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            PalaverError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PalaverError::Config(format!(
                "api.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(PalaverError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if let Some(path) = &self.session.token_path {
            if path.as_os_str().is_empty() {
                return Err(PalaverError::Config(
                    "session.token_path cannot be empty".to_string(),
                )
                .into());
            }
        }

        Ok(())
    }
}
