//! Catalog persistence for the admin API.
//!
//! # Documents
//!
//! - `categories.json` - Category records, in display order
//! - `products.json` - Product records
//!
//! Both live under `ADMIN_DATA_DIR`. Missing documents are seeded from the
//! built-in catalog on first open.

pub mod catalog;

use thiserror::Error;

pub use catalog::CatalogRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing a document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be parsed.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
