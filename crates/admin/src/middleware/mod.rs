//! Middleware and extractors for admin.

mod auth;

pub use auth::RequireApiToken;
