//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (DB ping)
//!
//! # Auth
//! GET  /auth/login                  - Redirect to Google consent
//! GET  /auth/callback               - Handle OAuth callback
//! POST /auth/logout                 - Clear the session user
//!
//! # Catalog
//! GET  /products                    - Listing (category / q filters)
//! GET  /products/{id}               - Detail with rating aggregate
//! GET  /products/{id}/reviews       - Reviews, newest first
//! POST /products/{id}/reviews       - Append a review (auth)
//!
//! # Checkout & orders
//! GET  /checkout/quote              - Shipping quote for a subtotal
//! POST /orders                      - Submit an order (auth)
//! GET  /orders                      - Caller's orders (auth)
//! GET  /orders/{id}                 - Owner-only detail + timeline (auth)
//!
//! # Profile & chrome
//! GET  /account/profile             - Profile (auth)
//! POST /account/profile             - Update profile (auth)
//! GET  /site/banner                 - Store name + announcement
//! ```

pub mod account;
pub mod auth;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod site;

use axum::{
    Router,
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

/// Create the product routes router (catalog + nested reviews).
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", get(reviews::index).post(reviews::create))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(site::health))
        .route("/health/ready", get(site::ready))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .route("/checkout/quote", get(checkout::quote))
        .nest("/orders", order_routes())
        .route(
            "/account/profile",
            get(account::show).post(account::update),
        )
        .route("/site/banner", get(site::banner))
}
