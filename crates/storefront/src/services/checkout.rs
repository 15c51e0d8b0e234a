//! Simulated checkout.
//!
//! Validates shipping details, prices the cart and clears it. No payment is
//! taken; every valid order succeeds.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use piko_pearl_core::{Email, OrderNumber, Price, ValidationErrors};

use crate::stores::{CartLineItem, CartStore};

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::from_cents(7500);

/// Flat shipping charge below the threshold.
pub const FLAT_SHIPPING: Price = Price::from_cents(899);

const ORDER_NUMBER_LEN: usize = 8;

/// Shipping details entered at checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Result of a placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    pub email: Email,
    pub items: Vec<CartLineItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Shipping charge for a subtotal.
#[must_use]
pub fn shipping_for(subtotal: Price) -> Price {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        FLAT_SHIPPING
    }
}

/// Place an order for everything in `cart`, then clear it.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if there is nothing to order, or
/// `CheckoutError::Invalid` with per-field messages if the shipping details
/// are incomplete. The cart is left untouched on error.
pub fn place_order(
    cart: &mut CartStore,
    details: &ShippingDetails,
) -> Result<OrderConfirmation, CheckoutError> {
    let email = validate(details)?;

    if cart.items().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = cart.total_price();
    let shipping = shipping_for(subtotal);
    let confirmation = OrderConfirmation {
        order_number: generate_order_number(),
        email,
        items: cart.items().to_vec(),
        subtotal,
        shipping,
        total: subtotal + shipping,
        placed_at: Utc::now(),
    };

    cart.clear();

    tracing::info!(
        order_number = %confirmation.order_number,
        lines = confirmation.items.len(),
        total = %confirmation.total,
        "Order placed"
    );

    Ok(confirmation)
}

fn validate(details: &ShippingDetails) -> Result<Email, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.required("name", "Name", &details.name, 100);
    errors.email("email", &details.email);
    errors.required("address", "Address", &details.address, 300);
    errors.into_result()?;

    Email::parse(&details.email).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email address is invalid");
        errors
    })
}

fn generate_order_number() -> OrderNumber {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ORDER_NUMBER_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    OrderNumber::new(format!("PP-{suffix}"))
}
