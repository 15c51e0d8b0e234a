//! Contact form intake.
//!
//! Messages are validated and written to the log; there is no mailbox behind
//! the form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use piko_pearl_core::ValidationErrors;

const MAX_MESSAGE_LENGTH: usize = 5000;

/// A submitted contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Receipt returned to the sender.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAcknowledgement {
    pub reference: Uuid,
    pub received_at: DateTime<Utc>,
    pub message: String,
}

/// Validate and record a contact message.
///
/// # Errors
///
/// Returns per-field messages if name, email or message are missing or too
/// long.
pub fn submit(form: &ContactForm) -> Result<ContactAcknowledgement, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.required("name", "Name", &form.name, 100);
    errors.email("email", &form.email);
    if let Some(subject) = &form.subject {
        errors.max_chars("subject", "Subject", subject, 200);
    }
    errors.required("message", "Message", &form.message, MAX_MESSAGE_LENGTH);
    errors.into_result()?;

    let reference = Uuid::new_v4();
    tracing::info!(
        %reference,
        name = form.name.trim(),
        email = form.email.trim(),
        subject = form.subject.as_deref().unwrap_or(""),
        message = form.message.trim(),
        "Contact message received"
    );

    Ok(ContactAcknowledgement {
        reference,
        received_at: Utc::now(),
        message: format!(
            "Thanks {}, we'll get back to you soon.",
            form.name.trim()
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_valid() {
        let ack = submit(&ContactForm {
            name: " Maya ".to_string(),
            email: "maya@example.com".to_string(),
            subject: Some("Custom order".to_string()),
            message: "Could you crochet a sunflower keychain?".to_string(),
        })
        .unwrap();

        assert_eq!(ack.message, "Thanks Maya, we'll get back to you soon.");
    }

    #[test]
    fn test_submit_reports_every_field() {
        let errors = submit(&ContactForm::default()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["email", "message", "name"]
        );
    }

    #[test]
    fn test_message_length_limit() {
        let errors = submit(&ContactForm {
            name: "Maya".to_string(),
            email: "maya@example.com".to_string(),
            subject: None,
            message: "x".repeat(MAX_MESSAGE_LENGTH + 1),
        })
        .unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["message"]);
    }
}
