//! secrets::file_store
//!
//! File-backed secret storage at `~/.bookctl/credentials.toml`.
//!
//! - The file is a flat TOML table of key → value
//! - On Unix the file is created with mode 0600 before any content is written
//! - Writes go to a sibling temp file which is then renamed over the target

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use super::traits::{SecretError, SecretStore};

/// File name of the credentials file inside the data directory.
pub const CREDENTIALS_FILE: &str = "credentials.toml";

/// Secret storage in a single TOML file.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Store at the default location, `~/.bookctl/credentials.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::with_path(home.join(".bookctl").join(CREDENTIALS_FILE)))
    }

    /// Store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SecretError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read credentials file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SecretError::ReadError(format!("cannot parse credentials file: {}", e)))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err("cannot create directory", e))?;
        }

        let content =
            toml::to_string(entries).map_err(|e| write_err("cannot serialize credentials", e))?;

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(0o600);

            let mut file = options
                .open(&temp_path)
                .map_err(|e| write_err("cannot create temp file", e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| write_err("cannot write credentials", e))?;
            file.sync_all()
                .map_err(|e| write_err("cannot sync to disk", e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| write_err("cannot rename temp file", e))
    }
}

fn write_err(what: &str, e: impl std::fmt::Display) -> SecretError {
    SecretError::WriteError(format!("{}: {}", what, e))
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
            .map_err(|e| SecretError::DeleteError(e.to_string()))
    }
}
