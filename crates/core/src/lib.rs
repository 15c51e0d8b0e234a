//! Piko & Pearl Core - Shared domain types.
//!
//! This crate provides the types shared by every Piko & Pearl component:
//! - `storefront` - Shopper-facing store (cart, wishlist, catalog, checkout)
//! - `admin` - Catalog API and category management
//! - `cli` - Command-line tools for catalog maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, slugs and ratings
//! - [`catalog`] - Category/product/review types, built-in catalog data and
//!   the review aggregation helper
//! - [`validation`] - Per-field form validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationErrors;
