//! api::traits
//!
//! The remote booking API as seen by the client.
//!
//! # Design
//!
//! The `BookingApi` trait is async because every call is network I/O. The
//! wire format is owned by the implementation; callers only depend on the
//! request/response types here and on [`ApiError::kind`] to tell an auth
//! failure from a transport failure.
//!
//! Adapters:
//! - Are invoked only after local validation has passed
//! - May fail without touching any client state
//! - Never include passwords or tokens in errors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::types::{FailureKind, User};

/// Errors from remote API calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The credentials were rejected when opening a session.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The session token was rejected.
    #[error("session is not authorized")]
    Unauthorized,

    /// The server rejected the request (4xx other than 401).
    #[error("request rejected: {status} - {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the server
        message: String,
    },

    /// The server failed (5xx).
    #[error("server error: {status} - {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the server
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify the error for user-facing handling.
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthorized => FailureKind::Auth,
            ApiError::Rejected { .. }
            | ApiError::Server { .. }
            | ApiError::Network(_)
            | ApiError::Decode(_) => FailureKind::Transport,
        }
    }

    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Server { .. } | ApiError::Network(_))
    }
}

/// Request to register a new user.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Credentials for opening a session.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Request to update the signed-in user's profile.
///
/// Password fields are sent only when the user is changing the password.
#[derive(Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl ProfileUpdate {
    /// Whether this update changes the password.
    pub fn changes_password(&self) -> bool {
        self.password.is_some()
    }
}

/// A successful session grant.
#[derive(Clone, Deserialize)]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
}

// Custom Debug implementations to redact secrets

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("changes_password", &self.changes_password())
            .finish()
    }
}

impl fmt::Debug for SessionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGrant")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// The remote booking API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared behind `Arc`
/// by the session store and the form actions.
///
/// # Error Handling
///
/// Callers discriminate with [`ApiError::kind`]:
/// - `FailureKind::Auth`: credentials or token rejected
/// - `FailureKind::Transport`: anything else; safe to retry
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Implementation name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Register a new user (`POST /users`).
    ///
    /// # Errors
    ///
    /// - `Rejected` if the server refuses the payload (e.g., email in use)
    /// - `Network` / `Server` on transport problems
    async fn create_user(&self, request: NewUser) -> Result<User, ApiError>;

    /// Open a session (`POST /sessions`).
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the email/password pair is wrong
    /// - `Network` / `Server` on transport problems
    async fn create_session(&self, credentials: Credentials) -> Result<SessionGrant, ApiError>;

    /// Update the signed-in user's profile (`PUT /profile`).
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is rejected
    /// - `Rejected` if the server refuses the update (e.g., wrong old password)
    async fn update_profile(&self, token: &str, update: ProfileUpdate)
        -> Result<User, ApiError>;
}
