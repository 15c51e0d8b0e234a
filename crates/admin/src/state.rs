//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::{CatalogRepository, RepositoryError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: CatalogRepository,
}

impl AppState {
    /// Open the catalog under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog documents cannot be loaded.
    pub async fn open(config: AdminConfig) -> Result<Self, RepositoryError> {
        let catalog = CatalogRepository::open(config.data_dir.clone()).await?;
        Ok(Self::new(config, catalog))
    }

    /// Create application state around an existing repository.
    #[must_use]
    pub fn new(config: AdminConfig, catalog: CatalogRepository) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog repository.
    #[must_use]
    pub fn catalog(&self) -> &CatalogRepository {
        &self.inner.catalog
    }
}
