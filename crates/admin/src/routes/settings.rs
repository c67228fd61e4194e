//! Site settings handlers.

use axum::{Json, extract::State, response::IntoResponse};

use echo_ember_core::SiteSettings;

use crate::db::SettingsRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Read the singleton settings row.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let settings = SettingsRepository::new(state.pool()).get().await?;
    Ok(Json(settings))
}

/// Overwrite the singleton. Last write wins; the storefront picks the
/// change up within its cache window.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<SiteSettings>,
) -> Result<impl IntoResponse> {
    let settings = SettingsRepository::new(state.pool()).update(&payload).await?;

    tracing::info!(admin = %admin.email, "site settings updated");
    Ok(Json(settings))
}
