//! core::config
//!
//! Configuration loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (`--api-url`)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$BOOKCTL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/bookctl/config.toml`
//! 3. `~/.bookctl/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use bookctl::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_url());
//! println!("Timeout: {:?}", config.request_timeout());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, SecretsConfig, SessionConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::secrets::DEFAULT_PROVIDER;

/// Default API location (the development server).
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with CLI overrides applied.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File configuration
    pub global: GlobalConfig,
    /// Path of the file that was loaded, if any
    path: Option<PathBuf>,
    /// `--api-url` override
    api_url_override: Option<String>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. A missing file is not an error.
    pub fn load() -> Result<Config, ConfigError> {
        let candidates = search_paths(|key| std::env::var(key).ok(), dirs::home_dir());

        match candidates.into_iter().find(|path| path.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Config {
            global,
            path: Some(path.to_path_buf()),
            api_url_override: None,
        })
    }

    /// Apply a `--api-url` override.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the URL is not http(s).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Result<Config, ConfigError> {
        let url = url.into();
        schema::validate_api_url(&url)?;
        self.api_url_override = Some(url);
        Ok(self)
    }

    /// The file this configuration came from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Base URL of the booking API.
    ///
    /// Defaults to `http://localhost:3333` if not configured.
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .or(self.global.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Per-request timeout.
    ///
    /// Defaults to 10 seconds if not configured.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.global
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Get the secrets provider.
    ///
    /// Defaults to "file" if not configured.
    pub fn secrets_provider(&self) -> &str {
        self.global
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    /// Local lifetime of new sessions, if configured. Values chrono cannot
    /// represent read as no expiry.
    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        self.global
            .session
            .as_ref()
            .and_then(|s| s.ttl_hours)
            .and_then(|h| i64::try_from(h).ok())
            .and_then(chrono::Duration::try_hours)
    }
}

/// Candidate config file locations in search order.
fn search_paths(env: impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = env("BOOKCTL_CONFIG") {
        paths.push(PathBuf::from(path));
    }

    if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg_home).join("bookctl/config.toml"));
    }

    if let Some(home) = home {
        paths.push(home.join(".bookctl/config.toml"));
    }

    paths
}
