//! Slug derivation.
//!
//! # Usage
//!
//! ```bash
//! pp-cli slug "Rose Bouquet"          # rose-bouquet
//! pp-cli slug --category "Bags"       # handmade-crochet-bags
//! ```

use piko_pearl_core::catalog::create_category_slug;
use piko_pearl_core::slugify;

/// Slug for a product name, or for a category display name with `category`.
#[must_use]
pub fn run(name: &str, category: bool) -> String {
    if category {
        create_category_slug(name)
    } else {
        slugify(name)
    }
}
