//! Catalog source port.

use async_trait::async_trait;

use crate::infrastructure::importers::ImportError;

/// Where catalog text comes from.
///
/// The importer only needs the raw JSON; sources decide how to fetch it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Read the full catalog text.
    async fn read_catalog(&self) -> Result<String, ImportError>;
}
