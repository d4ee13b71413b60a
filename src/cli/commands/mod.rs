//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the app (restores the saved session, mounts the screen graph)
//! 2. Refuses to run if its screen is not in the mounted graph
//! 3. Runs the form pipeline or reads the session
//!
//! # Async Commands
//!
//! Form commands are async because they call the API. Their sync wrappers
//! run them on a current-thread tokio runtime.

mod completion;
mod form_input;
mod profile;
mod sign_in;
mod sign_out;
mod sign_up;
mod status;

pub use completion::completion;
pub use profile::{profile, ProfileOptions};
pub use sign_in::sign_in;
pub use sign_out::sign_out;
pub use sign_up::sign_up;
pub use status::status;

use crate::cli::args::Command;
use crate::cli::context::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::SignIn { email, password } => sign_in(ctx, email, password),
        Command::SignUp {
            name,
            email,
            password,
        } => sign_up(ctx, name, email, password),
        Command::Profile {
            name,
            email,
            change_password,
            old_password,
            password,
            password_confirmation,
        } => profile(
            ctx,
            ProfileOptions {
                name,
                email,
                change_password,
                old_password,
                password,
                password_confirmation,
            },
        ),
        Command::SignOut => sign_out(ctx),
        Command::Status => status(ctx),
        Command::Completion { shell } => completion(shell),
    }
}
