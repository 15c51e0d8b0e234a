//! Contact form route handler.

use axum::Json;
use tracing::instrument;

use crate::error::Result;
use crate::services::contact::{self, ContactAcknowledgement, ContactForm};

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(form), fields(email = %form.email))]
pub async fn submit(Json(form): Json<ContactForm>) -> Result<Json<ContactAcknowledgement>> {
    Ok(Json(contact::submit(&form)?))
}
