//! Content importers.
//!
//! Loads the subclass catalog from its authoring format and converts it to
//! domain types, migrating legacy free-text options on the way in.

mod catalog;
mod catalog_types;
pub mod choice_text;

pub use catalog::{Catalog, CatalogImporter, ImportError, RefusedSubclass};
pub use choice_text::{
    extract_nested_choices, split_choice_options, Ambiguity, ExtractedChoices, InlineChoices,
    InlineOption,
};
