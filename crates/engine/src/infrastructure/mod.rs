//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod catalog_source;
pub mod clock;
pub mod config;
pub mod importers;
pub mod ports;
