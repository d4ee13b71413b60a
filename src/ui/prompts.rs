//! ui::prompts
//!
//! Interactive prompts for values missing from the command line.
//!
//! Prompts are only shown when stdin is a terminal. Otherwise they fail
//! with [`PromptError::NotInteractive`] and the command reports which flag
//! is missing.

use std::io::{self, BufRead, IsTerminal, Write};
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for a line of text. Surrounding whitespace is kept so that the
/// validator sees exactly what was typed, minus the newline.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{}: ", message).map_err(|e| PromptError::IoError(e.to_string()))?;
    stderr
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        return Err(PromptError::Cancelled);
    }

    Ok(trim_newline(line))
}

/// Prompt for masked input. The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    rpassword::prompt_password(format!("{}: ", message))
        .map_err(|e| PromptError::IoError(e.to_string()))
}

fn trim_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
