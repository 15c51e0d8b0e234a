//! Per-shopper state: cart and wishlist.
//!
//! Each shopper gets their own [`KeyValueStore`] namespace, opened once and
//! shared by every request in their session. Handlers lock a shopper for the
//! length of one operation, so mutations to the same cart never interleave.
//!
//! ```text
//! <storage_dir>/<shopper uuid>/piko-pearl-cart.json
//! <storage_dir>/<shopper uuid>/piko-pearl-wishlist.json
//! ```
//!
//! Shopper ids live only in sessions, so a directory whose session is gone
//! can never be reached again. [`ShopperRegistry::sweep_stale`] deletes
//! directories that are not open and have not been written for longer than
//! the session idle timeout.

mod cart;
mod wishlist;

pub use cart::{CART_STORAGE_KEY, CartLineItem, CartStore, NewCartItem};
pub use wishlist::{WISHLIST_STORAGE_KEY, WishlistEntry, WishlistStore};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use moka::future::Cache;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Documents a shopper directory may hold.
const SHOPPER_KEYS: [&str; 2] = [CART_STORAGE_KEY, WISHLIST_STORAGE_KEY];

/// A shopper's cart and wishlist.
pub struct Shopper {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
}

impl Shopper {
    /// Open both stores from the same backend.
    #[must_use]
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: CartStore::open(store.clone()),
            wishlist: WishlistStore::open(store),
        }
    }
}

/// Where shopper documents are kept.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// One directory per shopper under this root.
    Files(PathBuf),
    /// Process memory only.
    Memory,
}

/// Open shoppers, keyed by the id stored in their session.
///
/// A shopper stays open until it has been idle for `idle`, which callers set
/// to the session idle timeout. There is no capacity bound, so a shopper whose
/// session is still live is never evicted; with [`StorageBackend::Memory`]
/// eviction would lose their cart.
#[derive(Clone)]
pub struct ShopperRegistry {
    backend: StorageBackend,
    idle: Duration,
    open: Cache<Uuid, Arc<Mutex<Shopper>>>,
}

impl ShopperRegistry {
    #[must_use]
    pub fn new(backend: StorageBackend, idle: Duration) -> Self {
        let open = Cache::builder().time_to_idle(idle).build();
        Self {
            backend,
            idle,
            open,
        }
    }

    /// Get or open the shopper with `id`.
    pub async fn get(&self, id: Uuid) -> Arc<Mutex<Shopper>> {
        let backend = self.backend.clone();
        self.open
            .get_with(id, async move {
                let store: Arc<dyn KeyValueStore> = match backend {
                    StorageBackend::Files(root) => {
                        Arc::new(FileStore::new(root.join(id.to_string())))
                    }
                    StorageBackend::Memory => Arc::new(MemoryStore::new()),
                };
                tracing::debug!(shopper_id = %id, "Opened shopper stores");
                Arc::new(Mutex::new(Shopper::open(store)))
            })
            .await
    }

    /// Delete shopper directories that are closed and older than the idle
    /// timeout. Returns how many were removed.
    ///
    /// Entries not named by a shopper id are left alone. A directory that
    /// still holds other files after its documents are deleted is kept and
    /// not counted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the storage root cannot be listed.
    pub fn sweep_stale(&self) -> Result<usize, StorageError> {
        let StorageBackend::Files(root) = &self.backend else {
            return Ok(0);
        };
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0_usize;
        for entry in entries.filter_map(Result::ok) {
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| Uuid::parse_str(name).ok())
            else {
                continue;
            };
            if self.open.contains_key(&id) {
                continue;
            }

            match self.remove_if_stale(&entry.path(), now) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(shopper_id = %id, error = %e, "Failed to sweep shopper directory");
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, "Swept stale shopper directories");
        }
        Ok(removed)
    }

    fn remove_if_stale(&self, dir: &Path, now: SystemTime) -> Result<bool, StorageError> {
        let meta = fs::metadata(dir)?;
        let age = now.duration_since(meta.modified()?).unwrap_or_default();
        if !meta.is_dir() || age <= self.idle {
            return Ok(false);
        }

        let store = FileStore::new(dir);
        for key in SHOPPER_KEYS {
            store.remove(key)?;
        }
        fs::remove_dir(store.dir())?;
        Ok(true)
    }

    /// Run [`Self::sweep_stale`] now and then every `every`.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let registry = registry.clone();
                match tokio::task::spawn_blocking(move || registry.sweep_stale()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => tracing::warn!(error = %e, "Shopper sweep failed"),
                    Err(e) => tracing::error!(error = %e, "Shopper sweep panicked"),
                }
            }
        })
    }
}
