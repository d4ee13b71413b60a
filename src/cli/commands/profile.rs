//! profile command - Update the signed-in user's profile

use anyhow::{Context as _, Result};
use std::sync::Arc;

use super::form_input;
use crate::cli::context::{block_on, App, Context};
use crate::core::types::fields::{EMAIL, NAME, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION};
use crate::forms::{definitions, UpdateProfileAction};
use crate::navigation::{Graph, Screen};

/// Profile options parsed from CLI arguments.
#[derive(Debug, Default)]
pub struct ProfileOptions {
    pub name: Option<String>,
    pub email: Option<String>,
    pub change_password: bool,
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Update the profile. Name and email default to the session's values.
pub fn profile(ctx: &Context, opts: ProfileOptions) -> Result<()> {
    block_on(profile_async(ctx, opts))
}

async fn profile_async(ctx: &Context, opts: ProfileOptions) -> Result<()> {
    let app = App::open(ctx)?;
    app.require(Graph::App, "profile")?;
    app.gate.navigate(Screen::Profile)?;

    let session = app
        .store
        .current()
        .context("session disappeared while opening the profile")?;

    // Password fields are prompted only when changing the password.
    let password_field = |value: Option<String>| {
        if opts.change_password {
            value
        } else {
            Some(value.unwrap_or_default())
        }
    };

    let provided = [
        (NAME, Some(opts.name.unwrap_or(session.display_name))),
        (EMAIL, Some(opts.email.unwrap_or(session.email))),
        (OLD_PASSWORD, password_field(opts.old_password)),
        (PASSWORD, password_field(opts.password)),
        (PASSWORD_CONFIRMATION, password_field(opts.password_confirmation)),
    ];

    let pipeline = app.pipeline(
        definitions::profile(),
        Arc::new(UpdateProfileAction::new(app.store.clone())),
    );
    let values = form_input::collect(&pipeline, &provided, ctx.interactive)?;

    let outcome = pipeline.submit(values, &app.gate.mount_token()).await;
    form_input::finish(outcome, "profile update")
}
