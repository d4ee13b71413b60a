//! ui
//!
//! User interaction.
//!
//! # Modules
//!
//! - [`output`] - Terminal text respecting `--quiet`
//! - [`prompts`] - Interactive prompts for missing values
//! - [`surface`] - Renderer and notifier seams used by form pipelines

pub mod output;
pub mod prompts;
pub mod surface;

pub use surface::{
    FieldRenderer, Notice, NoticeLevel, Notifier, RecordingSurface, SurfaceEvent,
    TerminalSurface,
};
