//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    catalog_source::{EmbeddedCatalogSource, FileCatalogSource},
    clock::SystemClock,
    config::EngineConfig,
    importers::{Catalog, CatalogImporter, ImportError},
    ports::{CatalogSource, ClockPort},
};
use crate::stores::{ExpansionState, ProgressionStore};
use crate::use_cases::ProgressionUseCases;

/// Main application state.
///
/// Holds the immutable catalog, runtime stores and use cases.
pub struct App {
    pub config: EngineConfig,
    pub catalog: Arc<Catalog>,
    pub stores: Stores,
    pub use_cases: UseCases,
}

/// Container for runtime stores.
pub struct Stores {
    pub progressions: Arc<ProgressionStore>,
    pub view_state: Arc<ExpansionState>,
}

/// Container for all use cases.
pub struct UseCases {
    pub progression: ProgressionUseCases,
}

impl App {
    /// Compose the application around an already imported catalog.
    pub fn new(config: EngineConfig, catalog: Catalog, clock: Arc<dyn ClockPort>) -> Self {
        let catalog = Arc::new(catalog);
        let progressions = Arc::new(ProgressionStore::new());

        let use_cases = UseCases {
            progression: ProgressionUseCases::new(catalog.clone(), progressions.clone(), clock),
        };

        Self {
            config,
            catalog,
            stores: Stores {
                progressions,
                view_state: Arc::new(ExpansionState::new()),
            },
            use_cases,
        }
    }

    /// Import the configured catalog and compose the application.
    pub async fn load(config: EngineConfig) -> Result<Self, ImportError> {
        let source = catalog_source(&config);
        tracing::info!(
            source = %source.describe(),
            strict = config.strict_catalog,
            "Loading subclass catalog"
        );

        let catalog = CatalogImporter::new()
            .with_strict(config.strict_catalog)
            .import(source.as_ref())
            .await?;

        Ok(Self::new(config, catalog, Arc::new(SystemClock::new())))
    }
}

/// The catalog source selected by configuration.
pub fn catalog_source(config: &EngineConfig) -> Box<dyn CatalogSource> {
    match &config.catalog_path {
        Some(path) => Box::new(FileCatalogSource::new(path.clone())),
        None => Box::new(EmbeddedCatalogSource::new()),
    }
}
