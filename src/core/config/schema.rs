//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing: the API URL must be an absolute
//! http(s) URL, timeouts and session lifetimes must be positive, and the
//! secrets provider must be a known one.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::secrets::VALID_PROVIDERS;

/// User configuration.
///
/// # Example
///
/// ```toml
/// api_url = "https://api.example.com"
/// request_timeout_secs = 10
///
/// [secrets]
/// provider = "file"
///
/// [session]
/// ttl_hours = 720
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Base URL of the booking API
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,

    /// Session settings
    pub session: Option<SessionConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_url {
            validate_api_url(url)?;
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }

        if let Some(session) = &self.session {
            session.validate()?;
        }

        Ok(())
    }
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_api_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid api_url '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "invalid api_url '{}': unsupported scheme '{}'",
            url, other
        ))),
    }
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file", "keychain" or "memory")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    VALID_PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Longest accepted session lifetime: ten years.
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

/// Session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Local lifetime of new sessions, in hours. Unset means no expiry.
    pub ttl_hours: Option<u64>,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.ttl_hours {
            Some(0) => Err(ConfigError::InvalidValue(
                "session.ttl_hours must be greater than 0".to_string(),
            )),
            Some(hours) if hours > MAX_SESSION_TTL_HOURS => Err(ConfigError::InvalidValue(
                format!(
                    "session.ttl_hours must be at most {} (got {})",
                    MAX_SESSION_TTL_HOURS, hours
                ),
            )),
            _ => Ok(()),
        }
    }
}
