//! Wishlist store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use piko_pearl_core::catalog::ProductWithReviews;
use piko_pearl_core::{Price, ProductId};

use crate::storage::{KeyValueStore, PersistedCollection};

/// Storage key for the wishlist document.
pub const WISHLIST_STORAGE_KEY: &str = "piko-pearl-wishlist";

/// A saved product with the fields needed to render it without a catalog
/// lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: usize,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<&ProductWithReviews> for WishlistEntry {
    fn from(p: &ProductWithReviews) -> Self {
        Self {
            id: p.product.id.clone(),
            name: p.product.name.clone(),
            price: p.product.price,
            original_price: p.product.original_price,
            image: p.product.image.clone(),
            category: p.product.category.clone(),
            rating: p.rating,
            reviews: p.reviews,
            badge: p.product.badge.clone(),
            description: p.product.description.clone(),
        }
    }
}

/// The shopper's saved-for-later products, unique by id.
///
/// Persists after every mutation, like [`CartStore`](super::CartStore).
pub struct WishlistStore {
    entries: Vec<WishlistEntry>,
    storage: PersistedCollection<WishlistEntry>,
}

impl WishlistStore {
    /// Open the wishlist persisted in `store`.
    #[must_use]
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut storage = PersistedCollection::new(store, WISHLIST_STORAGE_KEY);
        let entries = dedup(storage.load());
        Self { entries, storage }
    }

    /// Entries in the order they were saved.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Save an entry. Returns `false` if its id was already saved.
    pub fn add_item(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        self.persist();
        true
    }

    /// Remove an entry. Returns `false` if it was not saved.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Remove the entry if saved, otherwise save it.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle_item(&mut self, entry: WishlistEntry) -> bool {
        if self.remove_item(&entry.id) {
            false
        } else {
            self.add_item(entry)
        }
    }

    /// Number of saved entries.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.entries.len()
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.entries) {
            tracing::error!(key = WISHLIST_STORAGE_KEY, error = %e, "Failed to persist wishlist");
        }
    }
}

fn dedup(stored: Vec<WishlistEntry>) -> Vec<WishlistEntry> {
    let mut entries: Vec<WishlistEntry> = Vec::with_capacity(stored.len());
    for entry in stored {
        if !entries.iter().any(|e| e.id == entry.id) {
            entries.push(entry);
        }
    }
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStore;

    fn entry(id: &str) -> WishlistEntry {
        WishlistEntry {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(1299),
            original_price: None,
            image: format!("/images/{id}.jpg"),
            category: "keychains".to_string(),
            rating: 4.5,
            reviews: 2,
            badge: None,
            description: String::new(),
        }
    }

    fn empty_wishlist() -> (Arc<MemoryStore>, WishlistStore) {
        let store = Arc::new(MemoryStore::new());
        let wishlist = WishlistStore::open(store.clone());
        (store, wishlist)
    }

    #[test]
    fn test_add_is_set_semantics() {
        let (_, mut wishlist) = empty_wishlist();
        assert!(wishlist.add_item(entry("1")));
        assert!(!wishlist.add_item(entry("1")));
        assert_eq!(wishlist.total_items(), 1);
    }

    #[test]
    fn test_remove() {
        let (_, mut wishlist) = empty_wishlist();
        wishlist.add_item(entry("1"));

        assert!(wishlist.remove_item(&ProductId::new("1")));
        assert!(!wishlist.remove_item(&ProductId::new("1")));
        assert!(!wishlist.contains(&ProductId::new("1")));
    }

    #[test]
    fn test_toggle() {
        let (_, mut wishlist) = empty_wishlist();
        assert!(wishlist.toggle_item(entry("1")));
        assert!(wishlist.contains(&ProductId::new("1")));
        assert!(!wishlist.toggle_item(entry("1")));
        assert!(!wishlist.contains(&ProductId::new("1")));
    }

    #[test]
    fn test_persisted_wishlist_reloads_in_order() {
        let (store, mut wishlist) = empty_wishlist();
        for id in ["3", "1", "2"] {
            wishlist.add_item(entry(id));
        }

        let reopened = WishlistStore::open(store);
        assert_eq!(reopened.items(), wishlist.items());
    }

    #[test]
    fn test_storage_key() {
        let (store, mut wishlist) = empty_wishlist();
        wishlist.add_item(entry("1"));
        assert!(store.get("piko-pearl-wishlist").unwrap().is_some());
    }

    #[test]
    fn test_malformed_storage_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(WISHLIST_STORAGE_KEY, "not-json").unwrap();

        let wishlist = WishlistStore::open(store);
        assert_eq!(wishlist.total_items(), 0);
    }

    #[test]
    fn test_from_enriched_product() {
        let product = piko_pearl_core::catalog::products_in("flowers").remove(0);
        let enriched = piko_pearl_core::catalog::product_with_reviews(&product, "flowers");
        let entry = WishlistEntry::from(&enriched);

        assert_eq!(entry.id, product.id);
        assert_eq!(entry.reviews, 5);
        assert!((entry.rating - enriched.rating).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_restores_membership(
            seeded in prop::collection::vec(0u8..6, 0..6),
            target in 0u8..6,
        ) {
            let (_, mut wishlist) = empty_wishlist();
            for id in &seeded {
                wishlist.add_item(entry(&id.to_string()));
            }
            let id = ProductId::new(target.to_string());
            let before = wishlist.contains(&id);
            let count_before = wishlist.total_items();

            wishlist.toggle_item(entry(id.as_str()));
            wishlist.toggle_item(entry(id.as_str()));

            prop_assert_eq!(wishlist.contains(&id), before);
            prop_assert_eq!(wishlist.total_items(), count_before);
        }

        #[test]
        fn prop_roundtrip_reconstructs_equal_collection(ids in prop::collection::vec(0u16..500, 0..20)) {
            let (store, mut wishlist) = empty_wishlist();
            for id in &ids {
                wishlist.add_item(entry(&id.to_string()));
            }

            let reopened = WishlistStore::open(store);
            prop_assert_eq!(reopened.items(), wishlist.items());
        }
    }
}
