//! Catalog API client implementation.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use piko_pearl_core::catalog::{Category, Product};

use super::CatalogApiError;
use super::cache::{CacheKey, CacheValue};
use crate::config::CatalogApiConfig;

// =============================================================================
// CatalogApiClient
// =============================================================================

/// Client for the catalog REST API.
///
/// Categories and products are cached for the configured TTL.
#[derive(Clone)]
pub struct CatalogApiClient {
    inner: Arc<CatalogApiClientInner>,
}

struct CatalogApiClientInner {
    client: reqwest::Client,
    base: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogApiClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogApiClientInner {
                client: reqwest::Client::new(),
                base: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base, path.trim_start_matches('/'))
    }

    /// GET an endpoint and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogApiError> {
        let endpoint = self.endpoint(path);
        let response = self.inner.client.get(&endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogApiError::Status { endpoint, status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            CatalogApiError::Parse(e)
        })
    }

    /// Fetch all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// category array.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_json("categories").await?;
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product array.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products").await?;
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Products whose category key matches `category` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn products_in(&self, category: &str) -> Result<Vec<Product>, CatalogApiError> {
        let key = category.to_lowercase();
        Ok(self
            .products()
            .await?
            .into_iter()
            .filter(|p| p.category.to_lowercase() == key)
            .collect())
    }

    /// Categories, or an empty list if the API is unavailable.
    pub async fn categories_or_empty(&self) -> Vec<Category> {
        self.categories().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to fetch categories");
            Vec::new()
        })
    }

    /// Products in a category, or an empty list if the API is unavailable.
    pub async fn products_in_or_empty(&self, category: &str) -> Vec<Product> {
        self.products_in(category).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, category, "Failed to fetch category products");
            Vec::new()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> CatalogApiClient {
        CatalogApiClient::new(&CatalogApiConfig {
            base_url: base.parse().unwrap(),
            cache_ttl: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let c = client("http://127.0.0.1:3001/");
        assert_eq!(c.endpoint("categories"), "http://127.0.0.1:3001/categories");

        let c = client("http://catalog.internal/api");
        assert_eq!(c.endpoint("/products"), "http://catalog.internal/api/products");
    }

    #[tokio::test]
    async fn test_unreachable_api_degrades_to_empty() {
        // Port 9 (discard) is not listening on loopback.
        let c = client("http://127.0.0.1:9");

        assert!(c.categories().await.is_err());
        assert!(c.categories_or_empty().await.is_empty());
        assert!(c.products().await.is_err());
        assert!(c.products_in_or_empty("flowers").await.is_empty());
    }
}
