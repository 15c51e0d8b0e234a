//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Health check
//!
//! # Cart
//! GET    /api/cart                       - Cart with totals
//! POST   /api/cart/items                 - Add item (merges by product id)
//! PATCH  /api/cart/items/{id}            - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}            - Remove item
//! DELETE /api/cart                       - Empty cart
//!
//! # Wishlist
//! GET    /api/wishlist                   - Saved products
//! POST   /api/wishlist/items             - Save product
//! GET    /api/wishlist/items/{id}        - Is product saved
//! DELETE /api/wishlist/items/{id}        - Remove product
//! POST   /api/wishlist/toggle            - Save or remove
//!
//! # Auth
//! POST   /api/auth/signup                - Create account and sign in
//! POST   /api/auth/login                 - Sign in
//! POST   /api/auth/logout                - Sign out
//! GET    /api/auth/me                    - Signed-in user (401 if none)
//!
//! # Catalog
//! GET    /api/catalog/categories                      - Categories
//! GET    /api/catalog/{category}/products             - Products with ratings
//! GET    /api/catalog/{category}/products/{id}/reviews - Reviews
//!
//! # Pages
//! GET    /api/navigate?page=...          - Resolve a page
//! POST   /api/checkout                   - Place order (simulated)
//! POST   /api/contact                    - Contact form
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod navigate;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/items", post(wishlist::add))
        .route("/items/{id}", get(wishlist::contains).delete(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::categories))
        .route("/{category}/products", get(catalog::products))
        .route("/{category}/products/{id}/reviews", get(catalog::reviews))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/catalog", catalog_routes())
        .route("/api/navigate", get(navigate::navigate))
        .route("/api/checkout", post(checkout::place_order))
        .route("/api/contact", post(contact::submit))
}
