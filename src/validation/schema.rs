//! validation::schema
//!
//! Declarative per-field rule sets.
//!
//! # Design
//!
//! A [`ValidationSchema`] is an ordered list of [`FieldSpec`]s. Each field
//! carries a list of tagged [`FieldRule`]s that the evaluator in
//! [`super::engine`] interprets. Field order is declaration order and is
//! preserved in every error set produced from the schema.
//!
//! # Example
//!
//! ```
//! use bookctl::validation::{FieldSpec, ValidationSchema};
//!
//! let schema = ValidationSchema::new()
//!     .field(FieldSpec::new("email").required("Email is required").email("Invalid email"))
//!     .field(FieldSpec::new("password").required("Password is required").min_length(6, "Too short"));
//!
//! assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["email", "password"]);
//! ```

/// Format constraint applied to a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// Value must look like an email address.
    Email,
    /// Value must have at least this many characters.
    MinLength(usize),
    /// Value must equal the raw value of another field.
    Matches(String),
}

/// Kind of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Value must be non-empty.
    Required,
    /// Value must be non-empty when any of the listed fields is non-empty.
    RequiredWhenAnyFilled(Vec<String>),
    /// Value must satisfy a format constraint.
    Format(Format),
}

/// A tagged rule together with the message reported when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub kind: RuleKind,
    pub message: String,
}

impl FieldRule {
    /// Whether this rule decides requiredness (as opposed to format).
    pub fn is_requirement(&self) -> bool {
        matches!(
            self.kind,
            RuleKind::Required | RuleKind::RequiredWhenAnyFilled(_)
        )
    }
}

/// Rules for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    rules: Vec<FieldRule>,
}

impl FieldSpec {
    /// Start a field with no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Require a non-empty value.
    pub fn required(self, message: impl Into<String>) -> Self {
        self.rule(RuleKind::Required, message)
    }

    /// Require a non-empty value whenever any of `fields` is filled.
    pub fn required_when_any<I, S>(self, fields: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.rule(RuleKind::RequiredWhenAnyFilled(fields), message)
    }

    /// Require an email-shaped value.
    pub fn email(self, message: impl Into<String>) -> Self {
        self.rule(RuleKind::Format(Format::Email), message)
    }

    /// Require at least `min` characters.
    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(RuleKind::Format(Format::MinLength(min)), message)
    }

    /// Require the value to equal another field's value.
    pub fn matches(self, other: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(RuleKind::Format(Format::Matches(other.into())), message)
    }

    fn rule(mut self, kind: RuleKind, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule {
            kind,
            message: message.into(),
        });
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

/// Ordered mapping of field name to rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSchema {
    fields: Vec<FieldSpec>,
}

impl ValidationSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A field declared twice replaces the earlier
    /// declaration in place so the set of keys stays unique.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Whether the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
