//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog_api::CatalogApiClient;
use crate::config::StorefrontConfig;
use crate::middleware::SESSION_IDLE_TIMEOUT;
use crate::services::AuthService;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::stores::{ShopperRegistry, StorageBackend};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the shopper registry and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shoppers: ShopperRegistry,
    auth: AuthService,
    catalog: CatalogApiClient,
}

impl AppState {
    /// Create application state backed by files under `config.storage_dir`.
    ///
    /// Shopper documents go in one subdirectory per shopper; the account
    /// directory sits at the root next to them.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let accounts: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_dir.clone()));
        let backend = StorageBackend::Files(config.storage_dir.clone());
        Self::with_backend(config, backend, accounts)
    }

    /// Create application state that keeps everything in memory.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::with_backend(config, StorageBackend::Memory, Arc::new(MemoryStore::new()))
    }

    fn with_backend(
        config: StorefrontConfig,
        backend: StorageBackend,
        accounts: Arc<dyn KeyValueStore>,
    ) -> Self {
        let catalog = CatalogApiClient::new(&config.catalog_api);

        Self {
            inner: Arc::new(AppStateInner {
                shoppers: ShopperRegistry::new(backend, SESSION_IDLE_TIMEOUT),
                auth: AuthService::open(accounts),
                catalog,
                config,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the open shoppers.
    #[must_use]
    pub fn shoppers(&self) -> &ShopperRegistry {
        &self.inner.shoppers
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogApiClient {
        &self.inner.catalog
    }
}
