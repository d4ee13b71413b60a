//! session::model
//!
//! The in-memory session and its persisted snapshot.
//!
//! # Security
//!
//! The auth token never appears in `Debug` output, logs, or error messages.
//! Logs identify a session by [`Session::fingerprint`], a short SHA-256
//! digest of the token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::errors::SessionError;
use crate::api::SessionGrant;
use crate::core::types::User;

/// Kind identifier for persisted session snapshots.
pub const SESSION_SNAPSHOT_KIND: &str = "bookctl.session";

/// Current schema version for session snapshots.
pub const SESSION_SNAPSHOT_VERSION: u32 = 1;

/// Secret store key the snapshot is saved under.
pub const SESSION_SNAPSHOT_KEY: &str = "session.snapshot";

/// The currently authenticated user plus the credentials for authorized
/// requests.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned user id.
    pub user_id: String,

    /// Name shown on the profile screen.
    pub display_name: String,

    /// Email address.
    pub email: String,

    /// Avatar URL, if any.
    pub avatar_ref: Option<String>,

    /// Bearer token for authorized requests.
    auth_token: String,

    /// When the session was opened.
    pub created_at: DateTime<Utc>,

    /// Local expiry, if a session lifetime is configured.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Build a session from a server grant.
    pub fn from_grant(grant: SessionGrant, ttl: Option<Duration>) -> Self {
        let now = Utc::now();
        Self {
            user_id: grant.user.id,
            display_name: grant.user.name,
            email: grant.user.email,
            avatar_ref: grant.user.avatar_url,
            auth_token: grant.token,
            created_at: now,
            expires_at: ttl.and_then(|ttl| now.checked_add_signed(ttl)),
        }
    }

    /// The bearer token. Never log this.
    pub fn token(&self) -> &str {
        &self.auth_token
    }

    /// Short, non-reversible identifier of the token for logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.auth_token.as_bytes());
        hex::encode(&digest[..6])
    }

    /// Whether the session has passed its local expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }

    /// Copy of this session with identity fields taken from `user`.
    /// The token and timestamps are kept.
    pub fn with_user(&self, user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            display_name: user.name.clone(),
            email: user.email.clone(),
            avatar_ref: user.avatar_url.clone(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("avatar_ref", &self.avatar_ref)
            .field("auth_token", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Persisted form of a [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Snapshot type identifier.
    pub kind: String,

    /// Schema version for forward compatibility.
    pub schema_version: u32,

    /// The session itself.
    pub session: Session,

    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(session: Session) -> Self {
        Self {
            kind: SESSION_SNAPSHOT_KIND.to_string(),
            schema_version: SESSION_SNAPSHOT_VERSION,
            session,
            saved_at: Utc::now(),
        }
    }

    /// Parse a snapshot, rejecting unknown kinds and versions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSnapshot` on malformed JSON or a schema
    /// mismatch.
    pub fn parse(json: &str) -> Result<Self, SessionError> {
        let snapshot: Self = serde_json::from_str(json)?;

        if snapshot.kind != SESSION_SNAPSHOT_KIND {
            return Err(SessionError::InvalidSnapshot(format!(
                "unexpected kind '{}', expected '{}'",
                snapshot.kind, SESSION_SNAPSHOT_KIND
            )));
        }

        if snapshot.schema_version != SESSION_SNAPSHOT_VERSION {
            return Err(SessionError::InvalidSnapshot(format!(
                "unsupported schema version {}, expected {}",
                snapshot.schema_version, SESSION_SNAPSHOT_VERSION
            )));
        }

        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::InvalidSnapshot(e.to_string()))
    }
}
