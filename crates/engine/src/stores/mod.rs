//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the catalog:
//! - `ProgressionStore` - Per-character subclass pick and selections
//! - `ExpansionState` - Which subclass cards and level panels are expanded

pub mod progression;
pub mod view_state;

// Re-export store types
pub use progression::ProgressionStore;
pub use view_state::ExpansionState;
