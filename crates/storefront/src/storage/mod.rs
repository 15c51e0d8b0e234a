//! Persistent key-value storage for shopper state.
//!
//! Cart, wishlist and account data are each stored as a single JSON document
//! under a fixed key, the way a browser keeps them in `localStorage`.
//!
//! # Document Format
//!
//! ```text
//! {"version": 1, "updated_at": "2026-10-16T09:30:00Z", "items": [...]}
//! ```
//!
//! A bare JSON array (the pre-versioned format) is still accepted on load.
//! Malformed documents and unknown versions are logged and treated as empty.
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key under a directory
//! - [`MemoryStore`] - process memory, for tests and throwaway shoppers

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current persisted document version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be encoded.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string-to-string persistent store.
///
/// Operations are synchronous; callers hold the owning store's lock for the
/// duration of a mutation plus its write-back.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    updated_at: DateTime<Utc>,
    items: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    updated_at: DateTime<Utc>,
    items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document<T> {
    Versioned(Envelope<T>),
    Legacy(Vec<T>),
}

#[derive(Deserialize)]
struct Header {
    updated_at: Option<DateTime<Utc>>,
}

/// A JSON collection persisted under one key.
///
/// Remembers the `updated_at` of the last document it read or wrote so it
/// can tell when another writer replaced the document in between.
pub struct PersistedCollection<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    last_seen: Option<DateTime<Utc>>,
    _items: PhantomData<fn() -> T>,
}

impl<T> PersistedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a collection to `key` in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            last_seen: None,
            _items: PhantomData,
        }
    }

    /// Load the stored items.
    ///
    /// Missing, unreadable or malformed documents yield an empty collection.
    pub fn load(&mut self) -> Vec<T> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Failed to read stored collection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Document<T>>(&raw) {
            Ok(Document::Versioned(doc)) if doc.version <= SCHEMA_VERSION => {
                self.last_seen = Some(doc.updated_at);
                doc.items
            }
            Ok(Document::Versioned(doc)) => {
                tracing::warn!(
                    key = self.key,
                    version = doc.version,
                    supported = SCHEMA_VERSION,
                    "Stored collection has a newer schema version, ignoring"
                );
                Vec::new()
            }
            Ok(Document::Legacy(items)) => {
                tracing::debug!(key = self.key, "Loaded unversioned collection");
                items
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Stored collection is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored document with `items`.
    ///
    /// The last write wins. If the stored document was written after the one
    /// this collection last saw, the overwrite is logged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be encoded or written.
    pub fn save(&mut self, items: &[T]) -> Result<(), StorageError> {
        if let Some(stored_at) = self.stored_updated_at()
            && self.last_seen.is_none_or(|seen| stored_at > seen)
        {
            tracing::warn!(
                key = self.key,
                stored_at = %stored_at,
                "Overwriting a newer stored collection written elsewhere"
            );
        }

        let updated_at = Utc::now();
        let doc = EnvelopeRef {
            version: SCHEMA_VERSION,
            updated_at,
            items,
        };
        let json = serde_json::to_string(&doc)?;
        self.store.set(self.key, &json)?;
        self.last_seen = Some(updated_at);
        Ok(())
    }

    fn stored_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(self.key).ok()??;
        serde_json::from_str::<Header>(&raw).ok()?.updated_at
    }
}
