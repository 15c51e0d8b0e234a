//! Public catalog API consumed by the storefront.

use axum::{Json, extract::State};
use tracing::instrument;

use piko_pearl_core::catalog::{Category, Product};

use crate::state::AppState;

/// List categories in display order.
///
/// GET /categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().await)
}

/// List all products.
///
/// GET /products
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().products().await)
}
