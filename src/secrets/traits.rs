//! secrets::traits
//!
//! Key/value storage for credentials that outlive the process.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include stored values in error messages
//! - Be thread-safe (Send + Sync)

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages never include stored values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Storage backend for persisted credentials.
///
/// Keys are namespaced strings such as `session.snapshot`.
pub trait SecretStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove a value. Succeeds when the key is already absent.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Whether a value is stored under `key`.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}
