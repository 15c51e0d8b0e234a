//! Piko & Pearl Admin library.
//!
//! Serves the catalog REST API the storefront reads from and the
//! token-protected category management endpoints.
//!
//! # Modules
//!
//! - [`db`] - JSON document repository for categories and products
//! - [`validation`] - Category form validation
//! - [`routes`] - JSON HTTP handlers
//!
//! # Security
//!
//! Category writes require `ADMIN_API_TOKEN` as a bearer token. Reads are
//! public so the storefront needs no credentials.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validation;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the admin router with request tracing.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        )
        .with_state(state)
}

fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
    DefaultOnResponse::default().on_response(response, latency, span);
}

async fn health() -> &'static str {
    "ok"
}
