//! session - who is signed in
//!
//! # Components
//!
//! - [`SessionStore`] - Shared session state with subscriber fan-out
//! - [`Session`] - The signed-in user plus bearer token
//! - [`SessionSnapshot`] - JSON schema for the persisted session
//! - [`Subscription`] - RAII handle for a registered listener
//!
//! # Security
//!
//! Tokens never appear in:
//! - logs (including --debug)
//! - error messages
//! - debug output
//!
//! Logs use [`Session::fingerprint`] instead.

mod errors;
mod model;
mod store;

pub use errors::{AuthError, SessionError};
pub use model::{
    Session, SessionSnapshot, SESSION_SNAPSHOT_KEY, SESSION_SNAPSHOT_KIND,
    SESSION_SNAPSHOT_VERSION,
};
pub use store::{Listener, SessionStore, SessionStoreBuilder, Subscription};
