//! Command implementations.
//!
//! Each command returns its output as a `String`; `main` decides where it
//! goes.

pub mod catalog;
pub mod category;
pub mod reviews;
pub mod slug;

use thiserror::Error;

use piko_pearl_admin::db::RepositoryError;
use piko_pearl_core::ValidationErrors;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading an input file failed.
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Input or output JSON was malformed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog documents could not be loaded.
    #[error("Catalog error: {0}")]
    Repository(#[from] RepositoryError),

    /// No category matches the given name, key or slug.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A category file failed validation.
    #[error("Category is invalid: {0}")]
    Invalid(#[from] ValidationErrors),
}
