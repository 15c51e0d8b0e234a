//! Authentication route handlers.
//!
//! Signup and login put the returned [`UserSession`] in the tower session;
//! logout takes it out again. The session id is cycled on every sign-in.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::services::UserSession;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an account and sign in.
///
/// POST /api/auth/signup
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignupRequest>,
) -> Result<Response> {
    let user = state
        .auth()
        .signup(&body.email, &body.password, &body.name)
        .await?;

    sign_in(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Sign in with email and password.
///
/// POST /api/auth/login
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserSession>> {
    let result = state.auth().login(&body.email, &body.password).await;
    let user = result.inspect_err(|_| tracing::info!("Login rejected"))?;

    sign_in(&session, &user).await?;

    Ok(Json(user))
}

/// Sign out. Always succeeds, signed in or not.
///
/// POST /api/auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    set_sentry_user(None);
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user.
///
/// GET /api/auth/me
pub async fn me(RequireAuth(user): RequireAuth) -> Json<UserSession> {
    Json(user)
}

async fn sign_in(session: &Session, user: &UserSession) -> Result<()> {
    session.cycle_id().await?;
    set_current_user(session, user).await?;
    set_sentry_user(Some(&user.email));
    tracing::info!(email = %user.email, "Signed in");
    Ok(())
}
