//! bookctl - sign-in, sign-up and profile management for a booking service
//!
//! The core is a session-gated navigation controller plus a validated form
//! submission pipeline shared by every form.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, runs forms)
//! - [`validation`] - Declarative field rules and their pure evaluator
//! - [`forms`] - Form definitions, remote actions and the submission pipeline
//! - [`session`] - The session store and its persisted snapshot
//! - [`navigation`] - Chooses the screen graph from session presence
//! - [`api`] - Booking API client (HTTP and in-memory mock)
//! - [`secrets`] - Secret storage abstraction
//! - [`core`] - Shared domain types and configuration
//! - [`ui`] - Terminal output, prompts, renderer and notifier seams
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Invariants
//!
//! 1. Exactly one screen graph is active once the session is restored, and
//!    it always matches session presence
//! 2. Invalid input never reaches the API
//! 3. A failed remote call never changes the session
//! 4. Tokens and passwords never appear in logs or debug output

pub mod api;
pub mod cli;
pub mod core;
pub mod forms;
pub mod logging;
pub mod navigation;
pub mod secrets;
pub mod session;
pub mod ui;
pub mod validation;
