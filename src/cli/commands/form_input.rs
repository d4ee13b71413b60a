//! Shared helpers for form commands: collecting values and reporting the
//! submit outcome.

use anyhow::{bail, Result};

use crate::core::types::fields::{EMAIL, NAME, OLD_PASSWORD, PASSWORD, PASSWORD_CONFIRMATION};
use crate::core::types::FormValues;
use crate::forms::{FocusStep, FormPipeline, SubmitOutcome};
use crate::ui::prompts::{self, PromptError};

/// Collect form values in focus order. Values given on the command line are
/// used as-is; missing ones are prompted for when interactive and left
/// empty otherwise, so validation reports them.
pub fn collect(
    pipeline: &FormPipeline,
    provided: &[(&str, Option<String>)],
    interactive: bool,
) -> Result<FormValues> {
    let mut values = FormValues::new();

    pipeline.open();
    let mut field = pipeline.definition().focus.first();
    while let Some(name) = field {
        let given = provided
            .iter()
            .find(|(f, _)| *f == name)
            .and_then(|(_, v)| v.clone());

        let value = match given {
            Some(value) => value,
            None => prompt(name, interactive)?,
        };
        values.set(name, value);

        field = match pipeline.advance_focus(name) {
            Some(FocusStep::Focus(next)) => Some(next),
            Some(FocusStep::Submit) | None => None,
        };
    }

    Ok(values)
}

fn prompt(field: &str, interactive: bool) -> Result<String> {
    let result = if field.contains("password") {
        prompts::password(label(field), interactive)
    } else {
        prompts::input(label(field), interactive)
    };

    match result {
        Ok(value) => Ok(value),
        Err(PromptError::NotInteractive) => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

fn label(field: &str) -> &str {
    match field {
        NAME => "Name",
        EMAIL => "Email",
        OLD_PASSWORD => "Current password",
        PASSWORD => "Password",
        PASSWORD_CONFIRMATION => "Confirm password",
        other => other,
    }
}

/// Turn a submit outcome into the command's result. Notices and field
/// errors were already shown by the pipeline.
pub fn finish(outcome: SubmitOutcome, what: &str) -> Result<()> {
    match outcome {
        SubmitOutcome::Succeeded => Ok(()),
        SubmitOutcome::Invalid(errors) => {
            bail!("{} not submitted: {} invalid field(s)", what, errors.len())
        }
        SubmitOutcome::Failed(kind) => bail!("{} failed ({} error)", what, kind),
        SubmitOutcome::Ignored | SubmitOutcome::Cancelled => bail!("{} was interrupted", what),
    }
}
