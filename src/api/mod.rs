//! api
//!
//! Abstraction over the remote booking API.
//!
//! # Architecture
//!
//! The `BookingApi` trait is the only way client code talks to the server.
//! Commands obtain an implementation through [`create_api`] rather than
//! constructing [`HttpApi`] directly.
//!
//! - Remote calls are made only after local validation has passed
//! - Remote failures never leave partial client state behind
//!
//! # Modules
//!
//! - `traits`: `BookingApi` and request/response types
//! - [`http`]: HTTP implementation
//! - [`mock`]: in-memory implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use bookctl::api::{create_api, BookingApi, Credentials};
//!
//! let api = create_api(&config)?;
//! let grant = api.create_session(Credentials::new("ana@x.com", "123456")).await?;
//! ```

pub mod http;
pub mod mock;
mod traits;

pub use http::HttpApi;
pub use traits::*;

use std::sync::Arc;

use crate::core::config::Config;

/// Create the API client described by `config`.
///
/// # Errors
///
/// Returns `ApiError::Network` if the HTTP client cannot be built.
pub fn create_api(config: &Config) -> Result<Arc<dyn BookingApi>, ApiError> {
    let api = HttpApi::new(config.api_url(), config.request_timeout())?;
    Ok(Arc::new(api))
}
