//! Piko & Pearl Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`storage`] - Key-value persistence for shopper documents
//! - [`stores`] - Cart and wishlist stores, one pair per shopper
//! - [`services`] - Accounts, checkout and contact
//! - [`catalog_api`] - Cached client for the catalog REST API
//! - [`navigation`] - Page resolution and slugs
//! - [`routes`] - JSON HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog_api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the storefront router.
///
/// From the outside in: request id, request span, session, routes. Sentry
/// layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        )
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state)
}

/// One span per request, tagged with the id assigned by the outer layer.
fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %middleware::request_id_of(request),
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// Liveness check. Does not touch storage or the catalog API.
async fn health() -> &'static str {
    "ok"
}
