//! Site chrome and health handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Payload for the navigation banner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub store_name: String,
    pub announcement_text: String,
    pub maintenance_mode: bool,
}

/// Store name and announcement from the cached settings.
pub async fn banner(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let settings = state.site_settings().await?;

    Ok(Json(Banner {
        store_name: settings.store_name,
        announcement_text: settings.announcement_text,
        maintenance_mode: settings.maintenance_mode,
    }))
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: pings the database.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
