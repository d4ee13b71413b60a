//! cli::context
//!
//! Per-invocation state shared by command handlers.

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;

use crate::api;
use crate::core::config::Config;
use crate::forms::{FormAction, FormContext, FormDefinition, FormPipeline};
use crate::navigation::{Graph, NavigationGate};
use crate::secrets;
use crate::session::SessionStore;
use crate::ui::output::{self, Verbosity};
use crate::ui::TerminalSurface;

/// Settings resolved from flags and config.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub verbosity: Verbosity,
    pub interactive: bool,
}

/// The running app: session store, navigation gate and terminal surface.
pub struct App {
    pub store: SessionStore,
    pub gate: Arc<NavigationGate>,
    pub surface: Arc<TerminalSurface>,
}

impl App {
    /// Build the app and restore the saved session.
    pub fn open(ctx: &Context) -> Result<Self> {
        let api = api::create_api(&ctx.config).context("failed to create API client")?;
        let secret_store = secrets::create_store(ctx.config.secrets_provider())
            .context("failed to open secret store")?;

        let mut builder = SessionStore::builder(api).persistence(secret_store);
        if let Some(ttl) = ctx.config.session_ttl() {
            builder = builder.ttl(ttl);
        }
        let store = builder.build();
        let gate = Arc::new(NavigationGate::attach(store.clone()));

        if let Err(e) = store.restore() {
            output::warn(format!("could not restore saved session: {}", e), ctx.verbosity);
        }
        if store.expire_if_stale(Utc::now()) {
            output::warn("saved session expired; sign in again", ctx.verbosity);
        }

        Ok(Self {
            store,
            gate,
            surface: Arc::new(TerminalSurface::new(ctx.verbosity)),
        })
    }

    /// Refuse to run `command` unless `graph` is the mounted graph.
    pub fn require(&self, graph: Graph, command: &str) -> Result<()> {
        match self.gate.mounted() {
            Some(mounted) if mounted == graph => Ok(()),
            Some(Graph::App) => bail!(
                "`{}` is only available while signed out; run `bookctl sign-out` first",
                command
            ),
            Some(Graph::Auth) => bail!(
                "`{}` requires a signed-in session; run `bookctl sign-in` first",
                command
            ),
            None => bail!("session has not been restored"),
        }
    }

    /// A pipeline for `definition` reporting to the terminal.
    pub fn pipeline(&self, definition: FormDefinition, action: Arc<dyn FormAction>) -> FormPipeline {
        FormPipeline::new(
            definition,
            action,
            FormContext {
                renderer: self.surface.clone(),
                notifier: self.surface.clone(),
                navigator: self.gate.clone(),
            },
        )
    }
}

/// Run an async command on a current-thread runtime.
pub fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    rt.block_on(future)
}
