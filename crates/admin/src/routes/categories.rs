//! Category management handlers.
//!
//! Both endpoints take a [`CategoryInput`] body. Invalid forms are answered
//! with 422 and a `fields` object mapping each failing field to its messages.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use piko_pearl_core::catalog::Category;

use crate::error::{AppError, Result};
use crate::middleware::RequireApiToken;
use crate::state::AppState;
use crate::validation::CategoryInput;

/// Create a category.
///
/// POST /admin/categories
#[instrument(skip_all)]
pub async fn create(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    body: std::result::Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = parse_body(body)?;
    let created = state.catalog().create_category(category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the category stored under `slug`.
///
/// PUT /admin/categories/{slug}
#[instrument(skip(_auth, state, body))]
pub async fn update(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: std::result::Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>> {
    let category = parse_body(body)?;
    let updated = state.catalog().update_category(&slug, category).await?;
    Ok(Json(updated))
}

fn parse_body(body: std::result::Result<Json<CategoryInput>, JsonRejection>) -> Result<Category> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let category = input.into_category().inspect_err(|errors| {
        tracing::info!(fields = %errors, "Category rejected");
    })?;
    Ok(category)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        Router,
        body::Body,
        http::{Request, header},
    };
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminConfig, SentryConfig};
    use crate::db::CatalogRepository;

    const TOKEN: &str = "k9Xq2LmT7vBz4RwP8nYc3HjD6sFg1QaE";

    fn app() -> Router {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: PathBuf::from("unused"),
            api_token: SecretString::from(TOKEN),
            json_logs: false,
            sentry: SentryConfig::default(),
        };
        crate::app(AppState::new(config, CatalogRepository::in_memory()))
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let body = json!({ "name": "Hats", "slug": "crochet-hats" });

        let response = app()
            .oneshot(request("POST", "/admin/categories", None, &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(request("POST", "/admin/categories", Some("wrong"), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_category() {
        let body = json!({ "name": "Hats", "slug": "crochet-hats", "metaTitle": "Hats" });
        let response = app()
            .oneshot(request("POST", "/admin/categories", Some(TOKEN), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["slug"], "crochet-hats");
        assert_eq!(json["metaTitle"], "Hats");
    }

    #[tokio::test]
    async fn test_invalid_category_lists_fields() {
        let body = json!({
            "name": "",
            "slug": "Not A Slug",
            "image": "nope",
            "metaTitle": "t".repeat(61),
        });
        let response = app()
            .oneshot(request("POST", "/admin/categories", Some(TOKEN), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Validation failed");
        for field in ["name", "slug", "image", "metaTitle"] {
            assert!(json["fields"][field].is_array(), "missing {field}");
        }
        assert!(json["fields"].get("metaDescription").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/admin/categories")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::from("{"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_slug() {
        let body = json!({ "name": "Hats", "slug": "crochet-hats" });
        let response = app()
            .oneshot(request("PUT", "/admin/categories/missing", Some(TOKEN), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_category() {
        let body = json!({
            "name": "Bags",
            "slug": "handmade-crochet-bags",
            "mainHeading": "Crochet Bags & Totes",
        });
        let response = app()
            .oneshot(request(
                "PUT",
                "/admin/categories/handmade-crochet-bags",
                Some(TOKEN),
                &body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["mainHeading"], "Crochet Bags & Totes");
    }

    #[tokio::test]
    async fn test_public_listings() {
        let response = app()
            .oneshot(Request::get("/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 4);

        let response = app()
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(!json.as_array().unwrap().is_empty());
    }
}
