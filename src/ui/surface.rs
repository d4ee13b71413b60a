//! ui::surface
//!
//! Where form pipelines report to: per-field error annotations, focus
//! moves, and transient notices.
//!
//! [`TerminalSurface`] prints to the terminal. [`RecordingSurface`] keeps
//! every event in memory for tests.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use super::output::{self, Verbosity};
use crate::validation::ValidationErrorSet;

/// Per-field annotations and focus for a form.
pub trait FieldRenderer: Send + Sync {
    /// Remove every field annotation.
    fn clear_errors(&self);

    /// Annotate each field named in `errors` with its message.
    fn show_errors(&self, errors: &ValidationErrorSet);

    /// Move input focus to `field`.
    fn focus(&self, field: &str);
}

/// Transient, non-field feedback.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A titled message shown outside the form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// Renders forms on stdout/stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSurface {
    verbosity: Verbosity,
}

impl TerminalSurface {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl FieldRenderer for TerminalSurface {
    // Nothing on screen to clear; each submit prints fresh.
    fn clear_errors(&self) {}

    fn show_errors(&self, errors: &ValidationErrorSet) {
        output::error(format!(
            "please fix the following fields:\n{}",
            output::format_field_errors(errors)
        ));
    }

    fn focus(&self, field: &str) {
        tracing::trace!(field, "focus");
    }
}

impl Notifier for TerminalSurface {
    fn notify(&self, notice: &Notice) {
        let text = format!("{}: {}", notice.title, notice.message);
        match notice.level {
            NoticeLevel::Success => output::success(text, self.verbosity),
            NoticeLevel::Error => output::error(text),
        }
    }
}

/// One thing a form asked the surface to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Cleared,
    Errors(ValidationErrorSet),
    Focus(String),
    Notice(Notice),
}

/// In-memory surface for tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent error set shown, if any.
    pub fn last_errors(&self) -> Option<ValidationErrorSet> {
        self.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::Errors(errors) => Some(errors.clone()),
            _ => None,
        })
    }

    pub fn focused(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Focus(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SurfaceEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FieldRenderer for RecordingSurface {
    fn clear_errors(&self) {
        self.push(SurfaceEvent::Cleared);
    }

    fn show_errors(&self, errors: &ValidationErrorSet) {
        self.push(SurfaceEvent::Errors(errors.clone()));
    }

    fn focus(&self, field: &str) {
        self.push(SurfaceEvent::Focus(field.to_string()));
    }
}

impl Notifier for RecordingSurface {
    fn notify(&self, notice: &Notice) {
        self.push(SurfaceEvent::Notice(notice.clone()));
    }
}
