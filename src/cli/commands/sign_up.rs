//! sign-up command - Create an account

use anyhow::Result;
use std::sync::Arc;

use super::form_input;
use crate::cli::context::{block_on, App, Context};
use crate::core::types::fields::{EMAIL, NAME, PASSWORD};
use crate::forms::{definitions, CreateUserAction};
use crate::navigation::{Graph, Screen};

/// Create a new account. Does not sign in.
pub fn sign_up(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    block_on(sign_up_async(ctx, name, email, password))
}

async fn sign_up_async(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let app = App::open(ctx)?;
    app.require(Graph::Auth, "sign-up")?;
    app.gate.navigate(Screen::SignUp)?;

    let pipeline = app.pipeline(
        definitions::sign_up(),
        Arc::new(CreateUserAction::new(Arc::clone(app.store.api()))),
    );
    let values = form_input::collect(
        &pipeline,
        &[(NAME, name), (EMAIL, email), (PASSWORD, password)],
        ctx.interactive,
    )?;

    let outcome = pipeline.submit(values, &app.gate.mount_token()).await;
    form_input::finish(outcome, "sign-up")
}
