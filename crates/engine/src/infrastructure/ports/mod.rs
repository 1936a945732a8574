//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Catalog text (file on disk, embedded copy, or a test double)
//! - Clock (for testing)

mod catalog;
mod testing;

pub use catalog::CatalogSource;
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use catalog::MockCatalogSource;
#[cfg(test)]
pub use testing::MockClockPort;
