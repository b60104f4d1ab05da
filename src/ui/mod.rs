//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use console::Term;

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_dry_run_notice, display_error, display_ref_list, display_separator, display_status,
    display_success,
};

/// Answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Source of yes/no answers for write confirmations
pub trait Prompt {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Interactive prompt on the terminal.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation. Default is "no"
/// if the user presses Enter.
pub struct ConsolePrompt {
    term: Term,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        ConsolePrompt {
            term: Term::stdout(),
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ConsolePrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.term.write_str(&format!("\n{} (y/N): ", message))?;
        let input = self.term.read_line()?;
        Ok(is_yes(&input))
    }
}

/// Prompt that always gives the same answer, for non-interactive runs
pub struct FixedPrompt(pub bool);

impl Prompt for FixedPrompt {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(self.0)
    }
}

fn is_yes(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Ask for confirmation unless `force` is set.
pub fn confirm_unless_forced(prompt: &dyn Prompt, force: bool, message: &str) -> Result<Confirmation> {
    if force {
        return Ok(Confirmation::Confirmed);
    }
    if prompt.confirm(message)? {
        Ok(Confirmation::Confirmed)
    } else {
        log::info!("operation cancelled by user");
        Ok(Confirmation::Declined)
    }
}
