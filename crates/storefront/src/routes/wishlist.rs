//! Wishlist route handlers.

use axum::{
    Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use piko_pearl_core::ProductId;

use crate::middleware::CurrentShopper;
use crate::stores::{WishlistEntry, WishlistStore};

/// Wishlist as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub items: Vec<WishlistEntry>,
    pub total_items: usize,
}

impl From<&WishlistStore> for WishlistView {
    fn from(wishlist: &WishlistStore) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            total_items: wishlist.total_items(),
        }
    }
}

/// Membership of one product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: ProductId,
    pub in_wishlist: bool,
    pub total_items: usize,
}

/// Display the wishlist.
///
/// GET /api/wishlist
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn show(shopper: CurrentShopper) -> Json<WishlistView> {
    let shopper = shopper.lock().await;
    Json(WishlistView::from(&shopper.wishlist))
}

/// Whether a product is saved.
///
/// GET /api/wishlist/items/{id}
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn contains(shopper: CurrentShopper, Path(id): Path<String>) -> Json<Membership> {
    let id = ProductId::new(id);
    let shopper = shopper.lock().await;
    Json(Membership {
        in_wishlist: shopper.wishlist.contains(&id),
        total_items: shopper.wishlist.total_items(),
        id,
    })
}

/// Save a product. Saving one that is already saved changes nothing.
///
/// POST /api/wishlist/items
#[instrument(skip(shopper), fields(shopper_id = %shopper.id, product_id = %entry.id))]
pub async fn add(shopper: CurrentShopper, Json(entry): Json<WishlistEntry>) -> Response {
    let mut shopper = shopper.lock().await;
    let status = if shopper.wishlist.add_item(entry) {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    (status, Json(WishlistView::from(&shopper.wishlist))).into_response()
}

/// Save the product if it is not saved, otherwise remove it.
///
/// POST /api/wishlist/toggle
#[instrument(skip(shopper), fields(shopper_id = %shopper.id, product_id = %entry.id))]
pub async fn toggle(shopper: CurrentShopper, Json(entry): Json<WishlistEntry>) -> Json<Membership> {
    let id = entry.id.clone();
    let mut shopper = shopper.lock().await;
    let in_wishlist = shopper.wishlist.toggle_item(entry);

    Json(Membership {
        id,
        in_wishlist,
        total_items: shopper.wishlist.total_items(),
    })
}

/// Remove a product.
///
/// DELETE /api/wishlist/items/{id}
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn remove(shopper: CurrentShopper, Path(id): Path<String>) -> Json<WishlistView> {
    let mut shopper = shopper.lock().await;
    shopper.wishlist.remove_item(&ProductId::new(id));
    Json(WishlistView::from(&shopper.wishlist))
}
