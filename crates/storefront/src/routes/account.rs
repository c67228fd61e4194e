//! Account profile handlers.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile update payload. Absent fields clear the stored value; the client
/// always submits the full form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Current profile for the signed-in user.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or(crate::db::RepositoryError::NotFound)?;

    Ok(Json(profile))
}

/// Update name/phone/address.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    let profile = UserRepository::new(state.pool())
        .update_profile(
            user.id,
            payload.name.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok(Json(profile))
}
