//! core
//!
//! Shared domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Form values, users and failure classification
//! - [`config`] - Configuration loading and precedence

pub mod config;
pub mod types;
