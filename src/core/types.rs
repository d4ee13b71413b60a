//! core::types
//!
//! Shared domain types.
//!
//! # Types
//!
//! - [`FormValues`] - raw field values for one submission attempt
//! - [`User`] - a user as confirmed by the server
//! - [`FailureKind`] - classification of remote failures
//! - [`fields`] - canonical form field names
//!
//! # Security
//!
//! `FormValues` implements a custom `Debug` that redacts any field whose name
//! contains "password", so submitted values can be logged safely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical field names shared by the forms and the remote API.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const OLD_PASSWORD: &str = "old_password";
    pub const PASSWORD: &str = "password";
    pub const PASSWORD_CONFIRMATION: &str = "password_confirmation";
}

/// Raw string values keyed by field name.
///
/// Missing fields read as the empty string.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw value for `field`, or `""` when absent.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    /// Whether `field` holds a non-blank value.
    pub fn is_filled(&self, field: &str) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Value for `field` if it is filled.
    pub fn filled(&self, field: &str) -> Option<&str> {
        self.is_filled(field).then(|| self.get(field))
    }

    /// Iterate over all fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for FormValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (field, value) in &self.0 {
            if field.contains("password") {
                map.entry(field, &"[REDACTED]");
            } else {
                map.entry(field, value);
            }
        }
        map.finish()
    }
}

/// A user as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Avatar URL, if the user uploaded one.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Classification of a failed remote action.
///
/// Validation failures never reach the remote side, so they are not part of
/// this classification; they are reported as field annotations instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server rejected the credentials or the session token.
    Auth,
    /// The server was unreachable, failed, or rejected an otherwise valid
    /// request. Safe to retry by resubmitting.
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Auth => write!(f, "auth"),
            FailureKind::Transport => write!(f, "transport"),
        }
    }
}
