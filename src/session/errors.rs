//! session::errors
//!
//! Error types for sign-in and session persistence.
//!
//! Messages never contain tokens or passwords.

use thiserror::Error;

use crate::api::ApiError;
use crate::core::types::FailureKind;
use crate::secrets::SecretError;

/// Errors from [`SessionStore::sign_in`](super::SessionStore::sign_in).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The server rejected the email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The server could not be reached or failed.
    #[error("sign-in failed: {0}")]
    Transport(ApiError),
}

impl AuthError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AuthError::InvalidCredentials => FailureKind::Auth,
            AuthError::Transport(_) => FailureKind::Transport,
        }
    }

    /// Check if this error indicates a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::InvalidCredentials => false,
            AuthError::Transport(e) => e.is_transient(),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidCredentials | ApiError::Unauthorized => AuthError::InvalidCredentials,
            other => AuthError::Transport(other),
        }
    }
}

/// Errors from persisting or restoring a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The snapshot is malformed or of an unknown schema.
    #[error("invalid session snapshot: {0}")]
    InvalidSnapshot(String),

    /// The secret store failed.
    #[error("session storage error: {0}")]
    Storage(#[from] SecretError),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::InvalidSnapshot(err.to_string())
    }
}
