//! Page resolution.
//!
//! Resolves a `current_page` value to a page, and for category and product
//! pages loads what the page shows.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use piko_pearl_core::Slug;
use piko_pearl_core::catalog::{self, Category, ProductWithReviews};

use crate::navigation::Page;
use crate::state::AppState;

/// Query string for `/api/navigate`.
#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    #[serde(default)]
    pub page: String,
}

/// A resolved page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub page: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductWithReviews>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductWithReviews>,
}

impl NavigateResponse {
    fn new(page: &Page) -> Self {
        Self {
            page: page.kind(),
            path: page.to_path(),
            category: None,
            products: Vec::new(),
            product: None,
        }
    }
}

/// Resolve a page.
///
/// GET /api/navigate?page=flowers/rose-bouquet
///
/// Unknown pages, categories and products answer 404 with
/// `"page": "not-found"`.
#[instrument(skip(state))]
pub async fn navigate(
    State(state): State<AppState>,
    Query(query): Query<NavigateQuery>,
) -> Response {
    let page = Page::parse(&query.page);

    match &page {
        Page::Category(slug) => {
            let Some(category) = find_category(&state, slug).await else {
                return not_found(&page);
            };
            let key = category.key();
            let products = state.catalog().products_in_or_empty(&key).await;

            let mut response = NavigateResponse::new(&page);
            response.products = catalog::category_products_with_reviews(&products, &key);
            response.category = Some(category);
            Json(response).into_response()
        }
        Page::Product { category, product } => {
            let Some(category) = find_category(&state, category).await else {
                return not_found(&page);
            };
            let key = category.key();
            let found = state
                .catalog()
                .products_in_or_empty(&key)
                .await
                .into_iter()
                .find(|p| p.slug() == product.as_str());
            let Some(found) = found else {
                return not_found(&page);
            };

            let mut response = NavigateResponse::new(&page);
            response.product = Some(catalog::product_with_reviews(&found, &key));
            response.category = Some(category);
            Json(response).into_response()
        }
        Page::NotFound(_) => not_found(&page),
        _ => Json(NavigateResponse::new(&page)).into_response(),
    }
}

/// A category addressed by its slug or its lowercase name.
async fn find_category(state: &AppState, slug: &Slug) -> Option<Category> {
    state
        .catalog()
        .categories_or_empty()
        .await
        .into_iter()
        .find(|c| c.slug == *slug || c.key() == slug.as_str())
}

fn not_found(page: &Page) -> Response {
    let response = NavigateResponse::new(&Page::NotFound(page.to_path()));
    (StatusCode::NOT_FOUND, Json(response)).into_response()
}
