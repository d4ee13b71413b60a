//! sign-out command - Forget the saved session

use anyhow::Result;

use crate::cli::context::{App, Context};
use crate::ui::output;

/// Sign out. Succeeds when already signed out.
pub fn sign_out(ctx: &Context) -> Result<()> {
    let app = App::open(ctx)?;

    if !app.store.is_present() {
        output::print("Not signed in.", ctx.verbosity);
        return Ok(());
    }

    app.store.sign_out();
    output::success("Signed out.", ctx.verbosity);
    Ok(())
}
