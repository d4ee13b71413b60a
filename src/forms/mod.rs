//! forms - validated form submission
//!
//! Every screen with inputs runs the same [`FormPipeline`]: clear errors,
//! validate against the form's schema, call the form's [`FormAction`], then
//! report through the renderer, notifier and navigator.
//!
//! # Modules
//!
//! - [`definitions`] - Schemas, focus chains and notices of each form
//! - [`actions`] - Remote calls behind each form
//! - [`pipeline`] - The submission state machine
//! - [`focus`] - Next-field handling

pub mod actions;
pub mod definitions;
pub mod focus;
pub mod pipeline;

pub use actions::{ActionError, CreateUserAction, FormAction, SignInAction, UpdateProfileAction};
pub use definitions::{FormDefinition, SuccessRoute};
pub use focus::{FocusChain, FocusStep};
pub use pipeline::{FormContext, FormPipeline, SubmitOutcome, SubmitState};
