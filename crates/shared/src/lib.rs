//! Grimoire Shared - Persisted form of subclass selections
//!
//! This crate owns everything about how a character's selection map looks on
//! disk or on the wire:
//! - The versioned [`SelectionDocument`] wrapper
//! - The historical selection shapes ([`LegacySelection`]) and their
//!   normalization into the domain's canonical form
//!
//! # Design Principles
//!
//! 1. **Canonical writes only** - legacy shapes are read, never written
//! 2. **No business logic** - completion and level gating live in the domain
//! 3. **Never fail on a bad entry** - unknown shapes degrade to an incomplete pick

pub mod normalize;
pub mod selection_document;

pub use normalize::{
    normalize_selection, normalize_selections, LegacySelection, NormalizedSelection,
    NormalizedSelections,
};
pub use selection_document::{
    DocumentError, LoadedDocument, SelectionDocument, CURRENT_DOCUMENT_VERSION,
};
