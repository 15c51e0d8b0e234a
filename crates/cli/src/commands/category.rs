//! Category file validation.
//!
//! Runs the same checks as `POST /admin/categories` against a JSON file, so
//! category edits can be reviewed before they are submitted.
//!
//! # Usage
//!
//! ```bash
//! pp-cli category validate hats.json
//! ```

use std::path::Path;

use piko_pearl_admin::validation::CategoryInput;

use super::CommandError;

/// Validate a category JSON file and return the normalized category.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or fails
/// validation.
pub fn validate(path: &Path) -> Result<String, CommandError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let input: CategoryInput = serde_json::from_str(&contents)?;

    let category = input.into_category().inspect_err(|errors| {
        for field in errors.fields() {
            for message in errors.field(field) {
                tracing::error!(field, "{message}");
            }
        }
    })?;

    tracing::info!(slug = %category.slug, "Category is valid");
    Ok(serde_json::to_string_pretty(&category)?)
}
