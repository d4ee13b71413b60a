//! forms::pipeline
//!
//! Validate, submit, report. One pipeline per mounted form.
//!
//! # States
//!
//! ```text
//! Idle -> Validating -> Invalid
//!                    -> Submitting -> Success
//!                                  -> RemoteFailure
//!                                  -> Cancelled
//! ```
//!
//! At most one action is in flight per pipeline. A submit that arrives
//! while another is running is ignored. The action is raced against the
//! mount token of the screen; if the screen is unmounted first, the result
//! is dropped without touching the screen. Dropping a `submit` future
//! mid-flight leaves the pipeline `Cancelled`, ready for the next submit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::actions::FormAction;
use super::definitions::{FormDefinition, SuccessRoute};
use super::focus::FocusStep;
use crate::core::types::{FailureKind, FormValues};
use crate::navigation::Navigator;
use crate::ui::{FieldRenderer, Notifier};
use crate::validation::{validate, ValidateOptions, ValidationErrorSet};

/// Where a pipeline is in its current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Success,
    RemoteFailure,
    Cancelled,
}

/// Result of one call to [`FormPipeline::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no remote call was made.
    Invalid(ValidationErrorSet),
    Succeeded,
    Failed(FailureKind),
    /// Another submit was already in flight.
    Ignored,
    /// The screen was unmounted before the action finished.
    Cancelled,
}

impl SubmitState {
    /// Whether an attempt currently owns the pipeline.
    pub fn in_flight(self) -> bool {
        matches!(self, SubmitState::Validating | SubmitState::Submitting)
    }
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded)
    }
}

/// The collaborators a pipeline reports to.
#[derive(Clone)]
pub struct FormContext {
    pub renderer: Arc<dyn FieldRenderer>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

pub struct FormPipeline {
    definition: FormDefinition,
    action: Arc<dyn FormAction>,
    context: FormContext,
    state: Mutex<SubmitState>,
}

impl FormPipeline {
    pub fn new(
        definition: FormDefinition,
        action: Arc<dyn FormAction>,
        context: FormContext,
    ) -> Self {
        Self {
            definition,
            action,
            context,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> SubmitState {
        *self.lock_state()
    }

    /// Focus the first field of the form.
    pub fn open(&self) {
        if let Some(first) = self.definition.focus.first() {
            self.context.renderer.focus(first);
        }
    }

    /// The user completed `field`. Moves focus along the chain and returns
    /// the step, so the caller can submit on [`FocusStep::Submit`].
    pub fn advance_focus(&self, field: &str) -> Option<FocusStep> {
        let step = self.definition.focus.advance(field)?;
        if let FocusStep::Focus(next) = step {
            self.context.renderer.focus(next);
        }
        Some(step)
    }

    /// Run one submission attempt.
    pub async fn submit(&self, values: FormValues, mount: &CancellationToken) -> SubmitOutcome {
        let form = self.definition.name;

        let Some(_attempt) = self.begin() else {
            debug!(form, "submit ignored: request in flight");
            return SubmitOutcome::Ignored;
        };

        self.context.renderer.clear_errors();

        if let Err(errors) = validate(&self.definition.schema, &values, ValidateOptions::ALL) {
            debug!(form, fields = %errors, "validation failed");
            self.set_state(SubmitState::Invalid);
            self.context.renderer.show_errors(&errors);
            return SubmitOutcome::Invalid(errors);
        }

        if mount.is_cancelled() {
            debug!(form, "screen unmounted before submit");
            self.set_state(SubmitState::Cancelled);
            return SubmitOutcome::Cancelled;
        }

        self.set_state(SubmitState::Submitting);
        debug!(form, action = self.action.name(), "submitting");

        let result = tokio::select! {
            biased;
            _ = mount.cancelled() => None,
            result = self.action.perform(&values) => Some(result),
        };

        match result {
            None => {
                info!(form, "screen unmounted, discarding response");
                self.set_state(SubmitState::Cancelled);
                SubmitOutcome::Cancelled
            }
            Some(Ok(())) => {
                info!(form, "submitted");
                self.set_state(SubmitState::Success);
                if let Some(notice) = &self.definition.success_notice {
                    self.context.notifier.notify(notice);
                }
                if self.definition.on_success == SuccessRoute::GoBack {
                    self.context.navigator.go_back();
                }
                SubmitOutcome::Succeeded
            }
            Some(Err(e)) => {
                warn!(form, kind = %e.kind, error = %e.detail, "submit failed");
                self.set_state(SubmitState::RemoteFailure);
                self.context.notifier.notify(&self.definition.failure_notice);
                SubmitOutcome::Failed(e.kind)
            }
        }
    }

    /// Claim the pipeline for a new attempt. `None` if one is running.
    fn begin(&self) -> Option<Attempt<'_>> {
        let mut state = self.lock_state();
        if state.in_flight() {
            return None;
        }
        *state = SubmitState::Validating;
        Some(Attempt { state: &self.state })
    }

    fn set_state(&self, next: SubmitState) {
        *self.lock_state() = next;
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The claim on a pipeline for one attempt. An attempt dropped before it
/// settles (the submit future was dropped) leaves the pipeline `Cancelled`
/// so the next submit can run.
struct Attempt<'a> {
    state: &'a Mutex<SubmitState>,
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.in_flight() {
            debug!("submit dropped before completion");
            *state = SubmitState::Cancelled;
        }
    }
}
