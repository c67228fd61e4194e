//! Admin sign-in handlers.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
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

/// Handle the provider's redirect back.
///
/// Unlike the storefront, this refuses to establish a session for any
/// account that is not on the admin allow-list.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse> {
    if let Some(error) = query.error {
        tracing::warn!(%error, "admin sign-in denied at the provider");
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

    // Allow-list gate: no session is written for anyone else
    if !state.config().is_admin_email(&profile.email) {
        tracing::warn!(email = %profile.email, "non-admin attempted admin sign-in");
        return Err(AppError::Auth(AuthError::NotAdmin));
    }

    let account = UserRepository::new(state.pool())
        .upsert_admin(
            &profile.email,
            profile.name.as_deref(),
            profile.picture.as_deref(),
        )
        .await?;

    let admin = CurrentAdmin {
        id: account.id,
        email: account.email,
        name: account.name,
    };

    set_current_admin(&session, &admin)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    tracing::info!(user_id = %admin.id, "admin signed in");
    Ok(Redirect::to("/"))
}

/// Clear the admin session.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_admin(&session)
        .await
        .map_err(|_| AppError::Auth(AuthError::Session))?;

    Ok(Redirect::to("/"))
}
