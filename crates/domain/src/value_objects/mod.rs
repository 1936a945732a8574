//! Value objects - Immutable objects defined by their attributes

mod level;
mod selection;

pub use level::{CharacterLevel, MAX_CHARACTER_LEVEL};
pub use selection::{CanonicalSelection, Selections};
