//! Domain entities - the immutable subclass catalog

mod subclass;

pub use subclass::{Choice, Feature, LevelBlock, NestedOption, Subclass};
