//! sign-in command - Open a session

use anyhow::Result;
use std::sync::Arc;

use super::form_input;
use crate::cli::context::{block_on, App, Context};
use crate::core::types::fields::{EMAIL, PASSWORD};
use crate::forms::{definitions, SignInAction};
use crate::navigation::Graph;
use crate::ui::output;

/// Sign in with email and password.
pub fn sign_in(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    block_on(sign_in_async(ctx, email, password))
}

async fn sign_in_async(
    ctx: &Context,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let app = App::open(ctx)?;
    app.require(Graph::Auth, "sign-in")?;

    let pipeline = app.pipeline(
        definitions::sign_in(),
        Arc::new(SignInAction::new(app.store.clone())),
    );
    let values = form_input::collect(
        &pipeline,
        &[(EMAIL, email), (PASSWORD, password)],
        ctx.interactive,
    )?;

    let outcome = pipeline.submit(values, &app.gate.mount_token()).await;
    form_input::finish(outcome, "sign-in")?;

    if let Some(session) = app.store.current() {
        output::success(
            format!("Signed in as {}", output::format_identity(&session)),
            ctx.verbosity,
        );
    }
    Ok(())
}
