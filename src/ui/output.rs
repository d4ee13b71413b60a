//! ui::output
//!
//! Terminal output that respects `--quiet` and `--debug`.
//!
//! This is user-facing text. Diagnostics go through `tracing` instead.
//! Normal results go to stdout; errors, warnings and field annotations go
//! to stderr so scripts can capture one without the other.

use std::fmt::Display;

use crate::session::Session;
use crate::validation::ValidationErrorSet;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    Normal,
    /// Normal output plus debug-level logging
    Debug,
}

impl Verbosity {
    /// `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    pub fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }
}

/// Print a result line to stdout unless quiet.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("{}", message);
    }
}

/// Print an error to stderr. Shown even when quiet.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning to stderr unless quiet.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("warning: {}", message);
    }
}

/// Print a confirmation to stdout unless quiet.
pub fn success(message: impl Display, verbosity: Verbosity) {
    print(message, verbosity);
}

/// One line per item, each with `prefix`.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Field errors as an indented `field: message` list.
pub fn format_field_errors(errors: &ValidationErrorSet) -> String {
    let lines: Vec<String> = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect();
    format_list(&lines, "  ")
}

/// `Name <email>` for the signed-in user.
pub fn format_identity(session: &Session) -> String {
    format!("{} <{}>", session.display_name, session.email)
}
