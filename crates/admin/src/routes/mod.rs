//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//!
//! # Catalog API (public, read-only)
//! GET  /categories                   - Categories in display order
//! GET  /products                     - All products
//!
//! # Category management (bearer token)
//! POST /admin/categories             - Create category
//! PUT  /admin/categories/{slug}      - Replace category
//! ```

pub mod catalog;
pub mod categories;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the category management router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(categories::create))
        .route("/{slug}", put(categories::update))
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::categories))
        .route("/products", get(catalog::products))
        .nest("/admin/categories", category_routes())
}
