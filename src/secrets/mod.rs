//! secrets
//!
//! Storage for credentials that must survive a restart (the persisted
//! session snapshot).
//!
//! # Providers
//!
//! - [`FileSecretStore`]: `~/.bookctl/credentials.toml` (default)
//! - `KeychainSecretStore`: OS keychain (`keychain` feature)
//! - [`MemorySecretStore`]: process-local, nothing persisted
//!
//! # Security
//!
//! - Stored values are never logged or included in error messages
//! - The file store uses 0600 permissions on Unix
//! - File writes are atomic (temp file + rename)

mod file_store;
#[cfg(feature = "keychain")]
mod keychain_store;
mod memory_store;
mod traits;

pub use file_store::{FileSecretStore, CREDENTIALS_FILE};
#[cfg(feature = "keychain")]
pub use keychain_store::{KeychainSecretStore, KEYCHAIN_SERVICE};
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};

use std::sync::Arc;

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Provider names accepted by [`create_store`].
pub const VALID_PROVIDERS: &[&str] = &["file", "keychain", "memory"];

/// Create a secret store by provider name.
///
/// # Errors
///
/// - Unknown provider name
/// - `keychain` without the `keychain` feature
/// - Initialization errors from the store
pub fn create_store(provider: &str) -> Result<Arc<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Arc::new(FileSecretStore::new()?)),
        "memory" => Ok(Arc::new(MemorySecretStore::new())),
        #[cfg(feature = "keychain")]
        "keychain" => Ok(Arc::new(KeychainSecretStore::new())),
        #[cfg(not(feature = "keychain"))]
        "keychain" => Err(SecretError::ProviderNotAvailable(
            "keychain support not enabled (compile with --features keychain)".into(),
        )),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: {})",
            other,
            VALID_PROVIDERS.join(", ")
        ))),
    }
}
