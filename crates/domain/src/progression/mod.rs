//! Progression rules evaluated against the catalog.
//!
//! Both modules are pure functions over an immutable [`Subclass`](crate::Subclass)
//! and the character's current state; nothing here is cached.

pub mod completion;
pub mod level_gate;

pub use completion::{
    required_choices, CompletionStatus, MissingChoices, MissingReason, UnmetPrerequisite,
};
pub use level_gate::{available_levels, locked_levels, LevelGate};
