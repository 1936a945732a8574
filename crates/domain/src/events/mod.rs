//! Domain Events
//!
//! ## Aggregate Mutation Events
//!
//! The `progression_events` submodule contains return types from aggregate
//! mutations, communicating what happened when state was modified.

pub mod progression_events;

pub use progression_events::*;
