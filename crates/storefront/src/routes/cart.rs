//! Cart route handlers.
//!
//! Every mutation answers with the full cart so the client can redraw the
//! cart drawer and the header badge from one response.

use axum::{
    Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use piko_pearl_core::{Price, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentShopper;
use crate::stores::{CartLineItem, CartStore, NewCartItem};

/// Cart as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    /// Distinct line items.
    pub total_items: usize,
    /// Units across all lines.
    pub total_quantity: u64,
    pub total_price: Price,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
        }
    }
}

/// Quantity update body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

/// Display the cart.
///
/// GET /api/cart
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn show(shopper: CurrentShopper) -> Json<CartView> {
    let shopper = shopper.lock().await;
    Json(CartView::from(&shopper.cart))
}

/// Add an item, merging with an existing line for the same product.
///
/// POST /api/cart/items
#[instrument(skip(shopper), fields(shopper_id = %shopper.id, product_id = %item.id))]
pub async fn add(shopper: CurrentShopper, Json(item): Json<NewCartItem>) -> Response {
    add_breadcrumb("cart", "Added item", "product_id", item.id.as_str());

    let mut shopper = shopper.lock().await;
    shopper.cart.add_item(item);

    (StatusCode::CREATED, Json(CartView::from(&shopper.cart))).into_response()
}

/// Set a line's quantity. Zero or less removes the line.
///
/// PATCH /api/cart/items/{id}
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn update(
    shopper: CurrentShopper,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantity>,
) -> Result<Json<CartView>> {
    let id = ProductId::new(id);
    let mut shopper = shopper.lock().await;

    if !shopper.cart.update_quantity(&id, body.quantity) {
        return Err(AppError::NotFound(format!("cart item {id}")));
    }

    Ok(Json(CartView::from(&shopper.cart)))
}

/// Remove a line. Removing an absent line is not an error.
///
/// DELETE /api/cart/items/{id}
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn remove(shopper: CurrentShopper, Path(id): Path<String>) -> Json<CartView> {
    let mut shopper = shopper.lock().await;
    shopper.cart.remove_item(&ProductId::new(id));
    Json(CartView::from(&shopper.cart))
}

/// Empty the cart.
///
/// DELETE /api/cart
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn clear(shopper: CurrentShopper) -> Json<CartView> {
    let mut shopper = shopper.lock().await;
    shopper.cart.clear();
    Json(CartView::from(&shopper.cart))
}
