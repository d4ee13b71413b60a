//! validation::engine
//!
//! Pure evaluator for [`ValidationSchema`].
//!
//! # Rules of evaluation
//!
//! - Fields are checked in schema order.
//! - For each field the requirement rules run first. An empty value that is
//!   required reports only the requirement message.
//! - An empty value that is not required passes without format checks.
//! - Format rules run in declaration order on non-empty values; the first
//!   failure is reported.
//! - Fields missing from the values read as `""`.

use regex::Regex;
use std::sync::LazyLock;

use super::errors::ValidationErrorSet;
use super::schema::{FieldSpec, Format, RuleKind, ValidationSchema};
use crate::core::types::FormValues;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
});

/// Evaluation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Stop at the first failing field.
    pub abort_early: bool,
}

impl ValidateOptions {
    /// Collect every failing field.
    pub const ALL: ValidateOptions = ValidateOptions { abort_early: false };

    /// Stop at the first failing field.
    pub const FIRST: ValidateOptions = ValidateOptions { abort_early: true };
}

/// Validate `values` against `schema`.
///
/// Returns `Ok(())` iff every field satisfies its rules.
///
/// # Example
///
/// ```
/// use bookctl::core::types::FormValues;
/// use bookctl::validation::{validate, FieldSpec, ValidateOptions, ValidationSchema};
///
/// let schema = ValidationSchema::new()
///     .field(FieldSpec::new("email").required("Email is required").email("Invalid email"));
///
/// let values = FormValues::new().with("email", "");
/// let errors = validate(&schema, &values, ValidateOptions::ALL).unwrap_err();
/// assert_eq!(errors.get("email"), Some("Email is required"));
/// ```
pub fn validate(
    schema: &ValidationSchema,
    values: &FormValues,
    opts: ValidateOptions,
) -> Result<(), ValidationErrorSet> {
    let mut errors = ValidationErrorSet::new();

    for spec in schema.fields() {
        if let Some(message) = check_field(spec, values) {
            errors.push(spec.name(), message);
            if opts.abort_early {
                break;
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns the message of the first failing rule for one field.
fn check_field<'s>(spec: &'s FieldSpec, values: &FormValues) -> Option<&'s str> {
    let value = values.get(spec.name());

    if is_blank(value) {
        return spec
            .rules()
            .iter()
            .filter(|rule| rule.is_requirement())
            .find(|rule| requirement_applies(&rule.kind, values))
            .map(|rule| rule.message.as_str());
    }

    spec.rules()
        .iter()
        .find(|rule| match &rule.kind {
            RuleKind::Format(format) => !format_holds(format, value, values),
            _ => false,
        })
        .map(|rule| rule.message.as_str())
}

fn requirement_applies(kind: &RuleKind, values: &FormValues) -> bool {
    match kind {
        RuleKind::Required => true,
        RuleKind::RequiredWhenAnyFilled(fields) => {
            fields.iter().any(|field| !is_blank(values.get(field)))
        }
        RuleKind::Format(_) => false,
    }
}

fn format_holds(format: &Format, value: &str, values: &FormValues) -> bool {
    match format {
        Format::Email => EMAIL_PATTERN.is_match(value),
        Format::MinLength(min) => value.chars().count() >= *min,
        Format::Matches(other) => value == values.get(other),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
