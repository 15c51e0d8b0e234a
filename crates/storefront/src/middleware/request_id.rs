//! Request correlation ids.
//!
//! Runs outside the trace layer: the id is written into the request headers
//! first so the `http_request` span can pick it up, then echoed on the
//! response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the request id in both directions.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Ensure every request carries an `x-request-id`.
///
/// An upstream id is kept when it is a short visible-ASCII token; anything
/// else is replaced with a fresh UUID v4.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let value = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| is_acceptable(v))
        .cloned()
        .unwrap_or_else(fresh_id);

    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), value.clone());

    if let Ok(id) = value.to_str() {
        sentry::configure_scope(|scope| scope.set_tag("request_id", id));
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    response
}

/// The id set by [`request_id_middleware`], or `""` outside it.
#[must_use]
pub fn request_id_of<B>(request: &axum::http::Request<B>) -> &str {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn is_acceptable(value: &HeaderValue) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_UPSTREAM_ID_LEN
        && bytes.iter().all(|b| b.is_ascii_graphic())
}

fn fresh_id() -> HeaderValue {
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
