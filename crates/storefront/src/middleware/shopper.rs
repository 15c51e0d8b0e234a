//! Shopper extractor.
//!
//! Every session is tied to a shopper id on first use. The id names the
//! shopper's storage namespace, so a returning browser with the same session
//! cookie sees the same cart and wishlist.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::sync::Mutex;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;
use crate::stores::Shopper;

/// The requesting shopper's cart and wishlist.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart_count(shopper: CurrentShopper) -> String {
///     shopper.lock().await.cart.total_items().to_string()
/// }
/// ```
pub struct CurrentShopper {
    pub id: Uuid,
    shopper: Arc<Mutex<Shopper>>,
}

impl CurrentShopper {
    /// Lock the shopper for the rest of the operation.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Shopper> {
        self.shopper.lock().await
    }
}

impl FromRequestParts<AppState> for CurrentShopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = shopper_id(session).await?;

        Ok(Self {
            id,
            shopper: state.shoppers().get(id).await,
        })
    }
}

/// Read the session's shopper id, assigning a new one on first visit.
async fn shopper_id(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(session_keys::SHOPPER_ID).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(session_keys::SHOPPER_ID, id).await?;
    tracing::debug!(shopper_id = %id, "Assigned new shopper");
    Ok(id)
}
