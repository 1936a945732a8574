pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod progression;
pub mod value_objects;

// Re-export catalog entities
pub use entities::{Choice, Feature, LevelBlock, NestedOption, Subclass};

pub use error::DomainError;

// Re-export aggregate and its mutation outcomes
pub use aggregates::SubclassProgression;
pub use events::{SelectionChange, SubclassChange};

// Re-export progression rules
pub use progression::{
    available_levels, locked_levels, required_choices, CompletionStatus, LevelGate,
    MissingChoices, MissingReason, UnmetPrerequisite,
};

// Re-export ID types
pub use ids::CharacterId;

// Re-export value objects
pub use value_objects::{CanonicalSelection, CharacterLevel, Selections, MAX_CHARACTER_LEVEL};
