//! status command - Show who is signed in

use anyhow::Result;

use crate::cli::context::{App, Context};
use crate::ui::output;

pub fn status(ctx: &Context) -> Result<()> {
    let app = App::open(ctx)?;

    match app.store.current() {
        Some(session) => {
            output::print(
                format!("Signed in as {}", output::format_identity(&session)),
                ctx.verbosity,
            );
            if let Some(expires) = session.expires_at {
                output::print(format!("Session expires {}", expires.to_rfc3339()), ctx.verbosity);
            }
        }
        None => output::print("Signed out.", ctx.verbosity),
    }

    output::print(
        format!(
            "Screen: {} ({} graph)",
            app.gate.current_screen(),
            app.gate.active_graph()
        ),
        ctx.verbosity,
    );
    Ok(())
}
