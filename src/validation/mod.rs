//! validation
//!
//! Declarative form validation.
//!
//! # Architecture
//!
//! - [`ValidationSchema`] / [`FieldSpec`] / [`FieldRule`] - ordered per-field
//!   rule declarations
//! - [`validate`] - pure evaluator producing a [`ValidationErrorSet`]
//!
//! Validation never performs I/O. It is the local check every form runs
//! before any remote call is made.

mod engine;
mod errors;
mod schema;

pub use engine::{validate, ValidateOptions};
pub use errors::{ValidationError, ValidationErrorSet};
pub use schema::{FieldRule, FieldSpec, Format, RuleKind, ValidationSchema};
