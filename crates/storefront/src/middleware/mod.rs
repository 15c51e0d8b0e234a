//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (set before the trace span is opened)
//! 3. `TraceLayer` (request tracing, tagged with the request id)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! Handlers then pull the shopper and the signed-in user out of the session
//! with the extractors below.

pub mod auth;
pub mod request_id;
pub mod session;
pub mod shopper;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware, request_id_of};
pub use session::{SESSION_IDLE_TIMEOUT, create_session_layer};
pub use shopper::CurrentShopper;
