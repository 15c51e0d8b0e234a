//! Shopping cart store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use piko_pearl_core::catalog::Product;
use piko_pearl_core::{Price, ProductId};

use crate::storage::{KeyValueStore, PersistedCollection};

/// Storage key for the cart document.
pub const CART_STORAGE_KEY: &str = "piko-pearl-cart";

/// One product in the cart with its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    /// Always at least 1.
    pub quantity: u32,
}

/// Item submitted to [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    /// Units to add; missing or zero means one.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl NewCartItem {
    /// One unit of a catalog product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            quantity: None,
        }
    }

    /// Set the number of units to add.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    fn units(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }
}

/// The shopper's cart.
///
/// Holds at most one line per product id, in insertion order. Every mutation
/// writes the whole cart back to storage before returning; a failed write is
/// logged and the in-memory cart stays authoritative.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: PersistedCollection<CartLineItem>,
}

impl CartStore {
    /// Open the cart persisted in `store`.
    #[must_use]
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut storage = PersistedCollection::new(store, CART_STORAGE_KEY);
        let items = normalize(storage.load());
        Self { items, storage }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Add an item, or increase the quantity of its existing line.
    pub fn add_item(&mut self, item: NewCartItem) {
        let units = item.units();
        if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
            line.quantity = line.quantity.saturating_add(units);
        } else {
            self.items.push(CartLineItem {
                id: item.id,
                name: item.name,
                price: item.price,
                image: item.image,
                category: item.category,
                quantity: units,
            });
        }
        self.persist();
    }

    /// Set the quantity of a line. A quantity of zero or less removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let Some(line) = self.items.iter_mut().find(|line| &line.id == id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.persist();
        true
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .map(|line| line.price.times(line.quantity))
            .sum()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.items) {
            tracing::error!(key = CART_STORAGE_KEY, error = %e, "Failed to persist cart");
        }
    }
}

/// Drop empty lines and merge duplicate ids from a stored document.
fn normalize(stored: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut items: Vec<CartLineItem> = Vec::with_capacity(stored.len());
    for line in stored.into_iter().filter(|line| line.quantity > 0) {
        if let Some(existing) = items.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            items.push(line);
        }
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStore;

    fn new_item(id: &str, cents: u32) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::from_cents(cents),
            image: format!("/images/{id}.jpg"),
            category: "flowers".to_string(),
            quantity: None,
        }
    }

    fn empty_cart() -> (Arc<MemoryStore>, CartStore) {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::open(store.clone());
        (store, cart)
    }

    #[test]
    fn test_add_new_item_defaults_to_one() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 3499));

        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 3499).with_quantity(0));
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_add_existing_item_increments_quantity() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 3499));
        cart.add_item(new_item("1", 3499).with_quantity(3));

        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_update_quantity() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1000));

        assert!(cart.update_quantity(&ProductId::new("1"), 5));
        assert_eq!(cart.items()[0].quantity, 5);
        assert!(!cart.update_quantity(&ProductId::new("missing"), 5));
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1000));
        cart.add_item(new_item("2", 1000));

        assert!(cart.update_quantity(&ProductId::new("1"), 0));
        assert!(cart.update_quantity(&ProductId::new("2"), -3));
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1000));

        assert!(!cart.remove_item(&ProductId::new("2")));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_totals() {
        let (_, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1250).with_quantity(2));
        cart.add_item(new_item("2", 499));

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_price(), Price::from_cents(2999));
    }

    #[test]
    fn test_clear() {
        let (store, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1250));
        cart.clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(CartStore::open(store).total_items(), 0);
    }

    #[test]
    fn test_every_mutation_persists() {
        let (store, mut cart) = empty_cart();
        cart.add_item(new_item("1", 1250));
        cart.add_item(new_item("2", 800));
        cart.update_quantity(&ProductId::new("2"), 4);
        cart.remove_item(&ProductId::new("1"));

        let reopened = CartStore::open(store);
        assert_eq!(reopened.items(), cart.items());
        assert_eq!(reopened.items()[0].quantity, 4);
    }

    #[test]
    fn test_open_normalizes_stored_lines() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                CART_STORAGE_KEY,
                r#"[
                    {"id":"1","name":"A","price":10,"image":"","category":"bags","quantity":2},
                    {"id":"1","name":"A","price":10,"image":"","category":"bags","quantity":3},
                    {"id":"2","name":"B","price":5,"image":"","category":"bags","quantity":0}
                ]"#,
            )
            .unwrap();

        let cart = CartStore::open(store);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_rejects_negative_and_out_of_range_prices() {
        let body = |price: &str| {
            format!(r#"{{"id":"1","name":"Rose","price":{price},"image":"","category":"flowers","quantity":10}}"#)
        };

        assert!(serde_json::from_str::<NewCartItem>(&body("-5")).is_err());
        assert!(serde_json::from_str::<NewCartItem>(&body("1e28")).is_err());
        assert_eq!(
            serde_json::from_str::<NewCartItem>(&body("12.5")).unwrap().price,
            Price::from_cents(1250)
        );
    }

    #[test]
    fn test_total_price_of_largest_lines_does_not_overflow() {
        let (store, mut cart) = empty_cart();
        for id in ["1", "2", "3"] {
            let mut item = new_item(id, 0).with_quantity(u32::MAX);
            item.price = Price::MAX;
            cart.add_item(item);
        }

        let total = cart.total_price();
        assert!(total > Price::MAX);
        assert_eq!(CartStore::open(store).total_price(), total);
    }

    #[test]
    fn test_stored_line_with_out_of_range_price_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"1","name":"A","price":1e28,"image":"","category":"bags","quantity":10}]"#,
            )
            .unwrap();

        let cart = CartStore::open(store);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_from_product() {
        let product = piko_pearl_core::catalog::products_in("bags").remove(0);
        let item = NewCartItem::from_product(&product).with_quantity(2);
        assert_eq!(item.id, product.id);
        assert_eq!(item.price, product.price);
        assert_eq!(item.quantity, Some(2));
    }

    proptest! {
        #[test]
        fn prop_quantity_equals_add_count(ids in prop::collection::vec(0u8..8, 0..40)) {
            let (_, mut cart) = empty_cart();
            let mut expected: HashMap<String, u32> = HashMap::new();
            for id in &ids {
                let id = id.to_string();
                cart.add_item(new_item(&id, 100));
                *expected.entry(id).or_default() += 1;
            }

            prop_assert_eq!(cart.total_items(), expected.len());
            for line in cart.items() {
                prop_assert_eq!(Some(&line.quantity), expected.get(line.id.as_str()));
            }
        }

        #[test]
        fn prop_explicit_quantities_accumulate(adds in prop::collection::vec((0u8..5, 1u32..10), 0..30)) {
            let (_, mut cart) = empty_cart();
            let mut expected: HashMap<String, u32> = HashMap::new();
            for (id, qty) in &adds {
                let id = id.to_string();
                cart.add_item(new_item(&id, 100).with_quantity(*qty));
                *expected.entry(id).or_default() += qty;
            }

            prop_assert_eq!(cart.total_items(), expected.len());
            for line in cart.items() {
                prop_assert_eq!(Some(&line.quantity), expected.get(line.id.as_str()));
            }
        }
    }
}
