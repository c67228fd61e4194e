//! OAuth sign-in route handlers.
//!
//! `GET /auth/login` redirects to Google with a fresh `state` nonce stored
//! in the session; `GET /auth/callback` verifies that nonce, exchanges the
//! code, upserts the account and establishes the session.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::{AuthError, OAuthClient};
use crate::state::AppState;

/// Query parameters Google sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Redirect the browser to the identity provider's consent screen.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let nonce = OAuthClient::generate_state();

    session
        .insert(session_keys::OAUTH_STATE, &nonce)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    let url = state.oauth().authorize_url(&nonce)?;
    Ok(Redirect::to(&url))
}

/// Handle the provider's redirect back: verify state, exchange the code,
/// upsert the user and sign them in.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse> {
    if let Some(error) = query.error {
        tracing::warn!(%error, "sign-in denied at the provider");
        return Ok(Redirect::to("/"));
    }

    let stored: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    let (Some(code), Some(returned)) = (query.code, query.state) else {
        return Err(AppError::BadRequest("missing code or state".to_owned()));
    };

    if stored.as_deref() != Some(returned.as_str()) {
        return Err(AppError::Auth(AuthError::StateMismatch));
    }

    let profile = state.oauth().exchange_code(&code).await?;

    let elevate = state.config().is_admin_email(&profile.email);
    let user = UserRepository::new(state.pool())
        .upsert_from_identity(&profile, elevate)
        .await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    };

    set_current_user(&session, &current)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user signed in");

    Ok(Redirect::to("/"))
}

/// Clear the session user.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    // Drop the Sentry user association along with the session
    sentry::configure_scope(|scope| scope.set_user(None));

    Ok(Redirect::to("/"))
}
