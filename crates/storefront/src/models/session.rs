//! Session-related types.
//!
//! Values kept in the tower session. The session itself lives in memory and
//! is gone when the process restarts; cart and wishlist documents are not.

/// Session keys.
pub mod keys {
    /// Key for the shopper id that names the shopper's storage namespace.
    pub const SHOPPER_ID: &str = "shopper_id";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
