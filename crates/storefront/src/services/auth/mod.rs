//! Authentication service.
//!
//! Password accounts kept in the storefront's own key-value store. A
//! successful signup or login returns the [`UserSession`] that the HTTP layer
//! keeps in the shopper's session; nothing here knows about cookies.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use piko_pearl_core::Email;

use crate::storage::{KeyValueStore, PersistedCollection};

/// Storage key for the account directory.
pub const USERS_STORAGE_KEY: &str = "piko-pearl-users";

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum display name length.
const MAX_NAME_LENGTH: usize = 100;

/// The signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub email: Email,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    email: Email,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<&StoredUser> for UserSession {
    fn from(user: &StoredUser) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Authentication service.
///
/// Handles account registration and password login. The account list is
/// locked only to look a user up and to insert one; argon2 hashing and
/// verification run on the blocking pool with no lock held.
pub struct AuthService {
    accounts: Mutex<Accounts>,
}

struct Accounts {
    users: Vec<StoredUser>,
    storage: PersistedCollection<StoredUser>,
}

impl AuthService {
    /// Open the account directory persisted in `store`.
    #[must_use]
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut storage = PersistedCollection::new(store, USERS_STORAGE_KEY);
        let users = storage.load();
        tracing::info!(accounts = users.len(), "Loaded account directory");
        Self {
            accounts: Mutex::new(Accounts { users, storage }),
        }
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::InvalidName` if the name is blank or too long.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::Storage` if the account cannot be saved.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserSession, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let name = validate_name(name)?;

        if self.accounts.lock().await.find(&email).is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = StoredUser {
            email,
            name,
            password_hash: hash_password(password.to_owned()).await?,
            created_at: Utc::now(),
        };
        let session = UserSession::from(&user);

        // Another signup for the same email may have finished while hashing.
        self.accounts.lock().await.insert(user)?;

        tracing::info!(email = %session.email, "Account created");
        Ok(session)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        let (session, hash) = self
            .accounts
            .lock()
            .await
            .find(&email)
            .map(|user| (UserSession::from(user), user.password_hash.clone()))
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.to_owned(), hash).await?;

        Ok(session)
    }

    /// Number of registered accounts.
    pub async fn account_count(&self) -> usize {
        self.accounts.lock().await.users.len()
    }
}

impl Accounts {
    fn find(&self, email: &Email) -> Option<&StoredUser> {
        self.users.iter().find(|u| &u.email == email)
    }

    fn insert(&mut self, user: StoredUser) -> Result<(), AuthError> {
        if self.find(&user.email).is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        self.users.push(user);
        if let Err(e) = self.storage.save(&self.users) {
            self.users.pop();
            return Err(e.into());
        }
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::InvalidName("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Hash a password using Argon2id on the blocking pool.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a hash on the blocking pool.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}
