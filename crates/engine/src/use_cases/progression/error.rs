//! Progression use case errors.

use grimoire_domain::DomainError;
use grimoire_shared::DocumentError;

/// Errors that can occur during progression operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("Subclass not found: {0}")]
    SubclassNotFound(String),
    #[error("Character has no subclass selected")]
    NoSubclassSelected,
    #[error("'{choice}' is not offered at level {level}")]
    UnknownChoice { level: u8, choice: String },
    #[error("'{sub_choice}' is not an option of '{choice}' at level {level}")]
    UnknownSubChoice {
        level: u8,
        choice: String,
        sub_choice: String,
    },
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Selection document error: {0}")]
    Document(#[from] DocumentError),
}
