//! HTTP route handlers for the admin service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (DB ping)
//!
//! # Auth
//! GET  /auth/login                  - Redirect to Google consent
//! GET  /auth/callback               - Handle OAuth callback (allow-list gated)
//! POST /auth/logout                 - Clear the admin session
//!
//! # Back office (all behind RequireAdmin)
//! GET  /dashboard                   - Aggregates, recomputed per request
//! GET  /products                    - Listing
//! POST /products                    - Create (multipart)
//! GET  /products/{id}               - Detail
//! POST /products/{id}               - Update with asset reconciliation (multipart)
//! DELETE /products/{id}             - Delete
//! GET  /orders                      - Listing with customer names
//! GET  /orders/{id}                 - Detail with items
//! POST /orders/{id}/status          - Status transition (422 when illegal)
//! GET  /settings                    - Singleton settings
//! POST /settings                    - Overwrite settings
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .post(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
}

/// Create all routes for the admin service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .nest("/auth", auth_routes())
        .route("/dashboard", get(dashboard::show))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/settings", get(settings::show).post(settings::update))
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: pings the database.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
