//! Catalog types and the review/rating helper.
//!
//! Products and categories are served by the catalog API; reviews are static
//! data keyed by `"<category>-<productId>"` and joined onto products here.

mod fixtures;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId, Rating, ReviewId, Slug, slugify};

pub use fixtures::{categories, products};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product category as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Display name (e.g., "Bags").
    pub name: String,
    /// URL slug (e.g., "handmade-crochet-bags").
    pub slug: Slug,
    /// Hero image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Page heading (e.g., "Handmade Crochet Bags").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Category {
    /// Lookup key used by products and review tables (`"Bags"` -> `"bags"`).
    #[must_use]
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Heading shown on the category page, falling back to the name.
    #[must_use]
    pub fn heading(&self) -> &str {
        self.main_heading.as_deref().unwrap_or(&self.name)
    }
}

/// A product record as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Pre-sale price, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    /// Category key (lowercase category name).
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// URL slug derived from the product name.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author: String,
    pub rating: Rating,
    /// Free-text relative date (e.g., "2 weeks ago").
    pub date: String,
    pub comment: String,
}

/// A product decorated with its review aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: Product,
    /// Average rating rounded to one decimal, `0` when unreviewed.
    pub rating: f64,
    /// Number of reviews.
    pub reviews: usize,
    pub reviews_data: Vec<Review>,
}

// =============================================================================
// Review Helper
// =============================================================================

/// Reviews for a product, or an empty slice when none are recorded.
///
/// The lookup key is `"<category>-<id>"`, lowercased.
///
/// ```
/// use piko_pearl_core::catalog::product_reviews;
///
/// assert_eq!(product_reviews("flowers", 1).len(), 5);
/// assert!(product_reviews("Flowers", "999").is_empty());
/// ```
#[must_use]
pub fn product_reviews(category: &str, id: impl fmt::Display) -> &'static [Review] {
    let key = format!("{category}-{id}").to_lowercase();
    fixtures::reviews()
        .get(key.as_str())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Mean rating rounded to one decimal place; `0.0` for no reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    Rating::average(reviews.iter().map(|r| r.rating))
}

/// Number of reviews.
#[must_use]
pub const fn review_count(reviews: &[Review]) -> usize {
    reviews.len()
}

/// Copy of `product` with its rating, review count and review list attached.
#[must_use]
pub fn product_with_reviews(product: &Product, category: &str) -> ProductWithReviews {
    let reviews = product_reviews(category, &product.id);
    ProductWithReviews {
        product: product.clone(),
        rating: average_rating(reviews),
        reviews: review_count(reviews),
        reviews_data: reviews.to_vec(),
    }
}

/// [`product_with_reviews`] over a whole category listing.
#[must_use]
pub fn category_products_with_reviews(
    products: &[Product],
    category: &str,
) -> Vec<ProductWithReviews> {
    products
        .iter()
        .map(|p| product_with_reviews(p, category))
        .collect()
}

// =============================================================================
// Category Lookup
// =============================================================================

/// Find a built-in category by display name or key, case-insensitively.
#[must_use]
pub fn category_by_name(name: &str) -> Option<&'static Category> {
    let name = name.trim();
    categories()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Slug for a category display name.
///
/// Known categories use their page heading (`"Bags"` ->
/// `"handmade-crochet-bags"`); anything else is slugified as-is.
#[must_use]
pub fn create_category_slug(name: &str) -> String {
    category_by_name(name).map_or_else(|| slugify(name), |c| slugify(c.heading()))
}

/// Built-in products belonging to a category key.
#[must_use]
pub fn products_in(category: &str) -> Vec<Product> {
    let key = category.to_lowercase();
    products()
        .iter()
        .filter(|p| p.category == key)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_reviews_lookup() {
        assert_eq!(product_reviews("flowers", 1).len(), 5);
        assert_eq!(product_reviews("FLOWERS", "1").len(), 5);
        assert!(product_reviews("flowers", 999).is_empty());
        assert!(product_reviews("teapots", 1).is_empty());
    }

    #[test]
    fn test_average_rating() {
        assert!((average_rating(&[]) - 0.0).abs() < f64::EPSILON);

        let reviews = product_reviews("bags", 2);
        let expected = Rating::average(reviews.iter().map(|r| r.rating));
        assert!((average_rating(reviews) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rating_five_and_four() {
        let mut reviews = product_reviews("flowers", 1)[..2].to_vec();
        reviews[0].rating = Rating::new(5).unwrap();
        reviews[1].rating = Rating::new(4).unwrap();
        assert!((average_rating(&reviews) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_product_with_reviews() {
        let product = products_in("flowers").into_iter().next().unwrap();
        let enriched = product_with_reviews(&product, "flowers");

        assert_eq!(enriched.product, product);
        assert_eq!(enriched.reviews, 5);
        assert_eq!(enriched.reviews_data.len(), 5);
        assert!(enriched.rating >= 1.0 && enriched.rating <= 5.0);
    }

    #[test]
    fn test_product_without_reviews_is_zero() {
        let product = Product {
            id: ProductId::new("999"),
            name: "Prototype".to_string(),
            price: Price::from_cents(100),
            original_price: None,
            image: String::new(),
            category: "flowers".to_string(),
            badge: None,
            description: String::new(),
        };
        let enriched = product_with_reviews(&product, "flowers");
        assert_eq!(enriched.reviews, 0);
        assert!(enriched.reviews_data.is_empty());
        assert!((enriched.rating - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_products_with_reviews_preserves_order() {
        let products = products_in("bags");
        let enriched = category_products_with_reviews(&products, "bags");
        let ids: Vec<_> = enriched.iter().map(|p| p.product.id.clone()).collect();
        let expected: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_enriched_product_json_shape() {
        let product = products_in("flowers").into_iter().next().unwrap();
        let json = serde_json::to_value(product_with_reviews(&product, "flowers")).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["reviews"], 5);
        assert!(json["reviewsData"].is_array());
        assert!(json.get("product").is_none());
    }

    #[test]
    fn test_create_category_slug() {
        assert_eq!(create_category_slug("Bags"), "handmade-crochet-bags");
        assert_eq!(create_category_slug("bags"), "handmade-crochet-bags");
        assert_eq!(create_category_slug("Gift Sets"), "gift-sets");
    }

    #[test]
    fn test_category_slugs_match_headings() {
        for category in categories() {
            assert_eq!(category.slug.as_str(), slugify(category.heading()));
        }
    }

    #[test]
    fn test_every_product_belongs_to_a_category() {
        for product in products() {
            assert!(
                category_by_name(&product.category).is_some(),
                "{} has unknown category {}",
                product.id,
                product.category
            );
        }
    }
}
