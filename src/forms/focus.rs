//! forms::focus
//!
//! "Next" handling: completing one field moves focus to the next, and
//! completing the last one submits the form.

/// What completing a field should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    /// Move focus to this field.
    Focus(&'static str),
    /// The last field was completed; submit the form.
    Submit,
}

/// Ordered fields of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChain {
    fields: &'static [&'static str],
}

impl FocusChain {
    pub const fn new(fields: &'static [&'static str]) -> Self {
        Self { fields }
    }

    /// The field focused when the form opens.
    pub fn first(&self) -> Option<&'static str> {
        self.fields.first().copied()
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Step after completing `field`, or `None` if the field is not part of
    /// this chain.
    pub fn advance(&self, field: &str) -> Option<FocusStep> {
        let position = self.fields.iter().position(|f| *f == field)?;
        Some(match self.fields.get(position + 1) {
            Some(next) => FocusStep::Focus(next),
            None => FocusStep::Submit,
        })
    }
}
