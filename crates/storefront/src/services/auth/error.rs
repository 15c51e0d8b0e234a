//! Account and sign-in failures.

use std::borrow::Cow;

use axum::http::StatusCode;
use thiserror::Error;

use piko_pearl_core::EmailError;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or wrong password; callers must not learn which.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    UserAlreadyExists,

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("account storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("password hashing failed")]
    PasswordHash,
}

impl AuthError {
    /// HTTP status a handler should answer with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidEmail(_) | Self::WeakPassword(_) | Self::InvalidName(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) | Self::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the shopper.
    #[must_use]
    pub fn public_message(&self) -> Cow<'_, str> {
        match self {
            Self::InvalidEmail(_) => "Invalid email address".into(),
            Self::InvalidCredentials => "Invalid credentials".into(),
            Self::UserAlreadyExists => "An account with this email already exists".into(),
            Self::WeakPassword(msg) | Self::InvalidName(msg) => msg.as_str().into(),
            Self::Storage(_) | Self::PasswordHash => "Authentication error".into(),
        }
    }
}
