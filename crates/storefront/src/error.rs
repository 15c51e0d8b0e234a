//! Storefront error type.
//!
//! Handlers return [`Result`]. Server-side failures are reported to Sentry
//! and answered with a generic message; client errors carry a message meant
//! for the shopper. Every body is JSON: `{"error": "..."}`, plus `fields` for
//! validation failures.

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use piko_pearl_core::{Email, ValidationErrors};

use crate::catalog_api::CatalogApiError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog API error: {0}")]
    CatalogApi(#[from] CatalogApiError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::BadRequest("Your cart is empty".to_string()),
            CheckoutError::Invalid(errors) => Self::Validation(errors),
        }
    }
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::CatalogApi(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => err.status(),
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> Cow<'_, str> {
        match self {
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".into()
            }
            Self::CatalogApi(_) => "Catalog service unavailable".into(),
            Self::Auth(err) => err.public_message(),
            Self::Validation(_) => "Validation failed".into(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => {
                msg.as_str().into()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
        }

        let body = match &self {
            Self::Validation(errors) => json!({
                "error": self.public_message(),
                "fields": errors,
            }),
            _ => json!({ "error": self.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in shopper to Sentry events, or detach with `None`.
pub fn set_sentry_user(email: Option<&Email>) {
    let user = email.map(|email| sentry::User {
        email: Some(email.to_string()),
        ..Default::default()
    });
    sentry::configure_scope(|scope| scope.set_user(user));
}

/// Record a shopper action as a Sentry breadcrumb with one data field.
pub fn add_breadcrumb(category: &str, message: &str, key: &str, value: &str) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        ..Default::default()
    };
    breadcrumb.data.insert(key.to_string(), value.into());
    sentry::add_breadcrumb(breadcrumb);
}
