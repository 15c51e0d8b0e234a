//! Checkout route handler.

use axum::{Json, http::StatusCode};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentShopper;
use crate::services::checkout::{self, OrderConfirmation, ShippingDetails};

/// Place an order for the current cart.
///
/// POST /api/checkout
///
/// Answers 422 with per-field messages for bad shipping details and 400 for
/// an empty cart.
#[instrument(skip(shopper, details), fields(shopper_id = %shopper.id))]
pub async fn place_order(
    shopper: CurrentShopper,
    Json(details): Json<ShippingDetails>,
) -> Result<(StatusCode, Json<OrderConfirmation>)> {
    let mut shopper = shopper.lock().await;
    let confirmation = checkout::place_order(&mut shopper.cart, &details)?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        "order_number",
        confirmation.order_number.as_str(),
    );

    Ok((StatusCode::CREATED, Json(confirmation)))
}
