//! Catalog source implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::infrastructure::importers::ImportError;
use crate::infrastructure::ports::CatalogSource;

/// Catalog shipped inside the binary.
const EMBEDDED_CATALOG: &str = include_str!("../../data/subclasses.json");

/// Reads the catalog from a JSON file on disk.
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_catalog(&self) -> Result<String, ImportError> {
        if !fs::try_exists(&self.path).await? {
            return Err(ImportError::CatalogNotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path).await?)
    }
}

/// Serves catalog text held in memory, by default the embedded catalog.
pub struct EmbeddedCatalogSource {
    text: &'static str,
}

impl EmbeddedCatalogSource {
    pub fn new() -> Self {
        Self {
            text: EMBEDDED_CATALOG,
        }
    }

    /// Serve arbitrary static text instead of the embedded catalog.
    pub fn from_static(text: &'static str) -> Self {
        Self { text }
    }
}

impl Default for EmbeddedCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for EmbeddedCatalogSource {
    fn describe(&self) -> String {
        "embedded catalog".to_string()
    }

    async fn read_catalog(&self) -> Result<String, ImportError> {
        Ok(self.text.to_string())
    }
}
