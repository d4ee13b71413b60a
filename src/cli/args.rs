//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//! - `--api-url <url>`: Override the configured API location

use clap::{Parser, Subcommand};

/// bookctl - sign in, sign up and manage your booking profile
#[derive(Parser, Debug)]
#[command(name = "bookctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Booking API base URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password
    #[command(
        name = "sign-in",
        long_about = "Sign in with email and password.\n\n\
            The session is saved locally and reused by later commands until you \
            sign out. Only available while signed out.",
        after_help = "\
EXAMPLES:
    # Prompt for the password
    bookctl sign-in --email ana@example.com

    # Non-interactive
    bookctl sign-in --email ana@example.com --password '******'"
    )]
    SignIn {
        /// Account email
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a new account
    #[command(
        name = "sign-up",
        long_about = "Create a new account.\n\n\
            Creating an account does not sign you in; run `bookctl sign-in` \
            afterwards. Only available while signed out."
    )]
    SignUp {
        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Account email
        #[arg(long)]
        email: Option<String>,

        /// Password, at least 6 characters (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Update the signed-in user's profile
    #[command(
        name = "profile",
        long_about = "Update the signed-in user's profile.\n\n\
            Name and email default to the current values. To change the password, \
            pass --change-password (prompts for all three) or all three password \
            flags. Only available while signed in.",
        after_help = "\
EXAMPLES:
    # Rename
    bookctl profile --name 'Ana Maria'

    # Change password interactively
    bookctl profile --change-password"
    )]
    Profile {
        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// Prompt for the current and new password
        #[arg(long)]
        change_password: bool,

        /// Current password
        #[arg(long)]
        old_password: Option<String>,

        /// New password
        #[arg(long)]
        password: Option<String>,

        /// New password again
        #[arg(long)]
        password_confirmation: Option<String>,
    },

    /// Sign out and forget the saved session
    #[command(name = "sign-out")]
    SignOut,

    /// Show who is signed in
    #[command(name = "status")]
    Status,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    bookctl completion bash > ~/.local/share/bash-completion/completions/bookctl

    # Zsh
    bookctl completion zsh > ~/.zfunc/_bookctl"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
