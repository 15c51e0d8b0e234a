//! Catalog export.
//!
//! # Usage
//!
//! ```bash
//! # Built-in catalog, every category
//! pp-cli catalog export
//!
//! # One category from an admin data directory
//! pp-cli catalog export --category bags --data-dir ./data/admin
//! ```

use std::path::Path;

use serde::Serialize;

use piko_pearl_admin::db::CatalogRepository;
use piko_pearl_core::catalog::{Category, ProductWithReviews, category_products_with_reviews};

use super::CommandError;

/// One category with its products and their review aggregates.
#[derive(Debug, Serialize)]
pub struct CategoryExport {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<ProductWithReviews>,
}

/// Export categories and their enriched products as pretty JSON.
///
/// `category` matches a display name, key or slug.
///
/// # Errors
///
/// Returns an error if the data directory cannot be loaded or `category`
/// matches nothing.
pub async fn export(category: Option<&str>, data_dir: Option<&Path>) -> Result<String, CommandError> {
    let repo = match data_dir {
        Some(dir) => CatalogRepository::load(dir).await?,
        None => CatalogRepository::in_memory(),
    };
    let categories = repo.categories().await;
    let products = repo.products().await;

    let selected: Vec<Category> = match category {
        Some(wanted) => {
            let found = categories
                .into_iter()
                .find(|c| c.name.eq_ignore_ascii_case(wanted) || c.slug.as_str() == wanted)
                .ok_or_else(|| CommandError::UnknownCategory(wanted.to_string()))?;
            vec![found]
        }
        None => categories,
    };

    let export: Vec<CategoryExport> = selected
        .into_iter()
        .map(|category| {
            let key = category.key();
            let in_category: Vec<_> = products
                .iter()
                .filter(|p| p.category == key)
                .cloned()
                .collect();
            CategoryExport {
                products: category_products_with_reviews(&in_category, &key),
                category,
            }
        })
        .collect();

    tracing::info!(categories = export.len(), "Catalog exported");
    Ok(serde_json::to_string_pretty(&export)?)
}
