//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod progression;

// Re-export main types
pub use progression::{ProgressionError, ProgressionUseCases};
