//! Database operations for the storefront.
//!
//! # Schema: `shop` (shared with the admin service)
//!
//! - `users` - Accounts created on first OAuth sign-in
//! - `products` - Catalog (read-only from this service)
//! - `orders` / `order_items` - The order engine's state
//! - `reviews` - Append-only product reviews
//! - `site_settings` - Singleton configuration row, seeded by migration
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p echo-ember-cli -- migrate
//! ```
//!
//! All queries use the sqlx runtime API with explicit row structs; no live
//! database is needed at compile time.

pub mod orders;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A submitted order had no valid line items left after validation.
    #[error("order has no valid items")]
    EmptyOrder,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
