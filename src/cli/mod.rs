//! cli
//!
//! Command-line interface for bookctl.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialize logging and load configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Sign-in, sign-up and profile updates all go
//! through [`crate::forms::FormPipeline`]; session state lives in
//! [`crate::session::SessionStore`] and which commands are allowed is
//! decided by [`crate::navigation::NavigationGate`].

pub mod args;
pub mod commands;
pub mod context;

pub use args::{Cli, Shell};
pub use context::{App, Context};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::logging;
use crate::ui::output::Verbosity;
use crate::ui::prompts;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    logging::init(verbosity);

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = config.path() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let ctx = Context {
        config,
        verbosity,
        interactive: !cli.quiet && prompts::is_interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}
