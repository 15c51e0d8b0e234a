//! Catalog route handlers.
//!
//! Category and product listings come from the catalog API and degrade to
//! empty lists when it is down. Reviews come from the built-in review tables
//! and never fail.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use piko_pearl_core::catalog::{
    self, Category, ProductWithReviews, Review, average_rating, review_count,
};

use crate::state::AppState;

/// Reviews for one product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub rating: f64,
    pub reviews: usize,
    pub reviews_data: Vec<Review>,
}

/// List categories.
///
/// GET /api/catalog/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories_or_empty().await)
}

/// List a category's products with ratings attached.
///
/// GET /api/catalog/{category}/products
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<ProductWithReviews>> {
    let products = state.catalog().products_in_or_empty(&category).await;
    Json(catalog::category_products_with_reviews(
        &products, &category,
    ))
}

/// Reviews for a product.
///
/// GET /api/catalog/{category}/products/{id}/reviews
#[instrument]
pub async fn reviews(Path((category, id)): Path<(String, String)>) -> Json<ReviewSummary> {
    let reviews = catalog::product_reviews(&category, &id);
    Json(ReviewSummary {
        rating: average_rating(reviews),
        reviews: review_count(reviews),
        reviews_data: reviews.to_vec(),
    })
}
