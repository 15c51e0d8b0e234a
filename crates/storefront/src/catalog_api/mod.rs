//! Catalog REST API client.
//!
//! # Architecture
//!
//! - The admin service is the source of truth for categories and products
//! - `GET {base}/categories` and `GET {base}/products` return JSON arrays
//! - In-memory caching via `moka` (TTL from `CATALOG_CACHE_TTL_SECS`)
//!
//! Callers that render pages use the `*_or_empty` accessors: a catalog outage
//! is logged and the page renders with nothing in it rather than failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use piko_pearl_storefront::catalog_api::CatalogApiClient;
//!
//! let client = CatalogApiClient::new(&config.catalog_api);
//! let flowers = client.products_in_or_empty("flowers").await;
//! ```

mod cache;
mod client;

pub use client::CatalogApiClient;

use thiserror::Error;

/// Errors that can occur when fetching from the catalog API.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status.
    #[error("catalog API returned {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
