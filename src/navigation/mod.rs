//! navigation - session-gated screen graphs
//!
//! Two graphs exist: [`Graph::Auth`] (sign-in, sign-up) and [`Graph::App`]
//! (dashboard, profile). Exactly one is active, and it is always the one
//! matching session presence.

mod gate;
mod routes;

pub use gate::{NavigationGate, Navigator};
pub use routes::{Graph, Screen};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The screen belongs to the other graph.
    #[error("screen {screen} is not available in the {graph} graph")]
    NotInGraph { screen: Screen, graph: Graph },
}
