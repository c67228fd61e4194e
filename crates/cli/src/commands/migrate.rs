//! Database migration command.
//!
//! The `shop` schema migrations live with the storefront crate and are
//! embedded into this binary at build time.

use super::{CliError, connect};

/// Run the shop migrations.
///
/// # Errors
///
/// Returns `CliError` when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
