//! logging
//!
//! Diagnostic logging to stderr via `tracing`.
//!
//! The level follows `--debug`/`--quiet` unless `BOOKCTL_LOG` is set, in
//! which case it is used as an `EnvFilter` directive (for example
//! `BOOKCTL_LOG=bookctl::forms=trace`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::ui::output::Verbosity;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "BOOKCTL_LOG";

/// Default filter directive for a verbosity level.
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Debug => "bookctl=debug,info",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity == Verbosity::Debug),
        )
        .try_init();
}
