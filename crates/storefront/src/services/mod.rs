//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password accounts (signup, login)
//! - `checkout` - Simulated order placement
//! - `contact` - Contact form intake

pub mod auth;
pub mod checkout;
pub mod contact;

pub use auth::{AuthError, AuthService, UserSession};
