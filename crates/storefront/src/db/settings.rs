//! Site settings repository.
//!
//! `shop.site_settings` holds exactly one row, seeded by migration, so
//! reads never race a lazy initializer. The storefront only reads; writes
//! go through the admin service.

use rust_decimal::Decimal;
use sqlx::PgPool;

use echo_ember_core::SiteSettings;

use super::RepositoryError;

/// Raw settings row as stored in `shop.site_settings`.
#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    store_name: String,
    support_email: Option<String>,
    shipping_cost: Decimal,
    free_shipping_threshold: Decimal,
    announcement_text: String,
    maintenance_mode: bool,
}

impl From<SettingsRow> for SiteSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            store_name: row.store_name,
            support_email: row.support_email,
            shipping_cost: row.shipping_cost,
            free_shipping_threshold: row.free_shipping_threshold,
            announcement_text: row.announcement_text,
            maintenance_mode: row.maintenance_mode,
        }
    }
}

/// Repository for site-wide settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the singleton settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the seed row is missing
    /// (migrations did not run), or `Database` on query failure.
    pub async fn get(&self) -> Result<SiteSettings, RepositoryError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r"
            SELECT store_name, support_email, shipping_cost, free_shipping_threshold,
                   announcement_text, maintenance_mode
            FROM shop.site_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        row.map(SiteSettings::from).ok_or_else(|| {
            RepositoryError::DataCorruption(
                "site_settings seed row missing; run migrations".to_owned(),
            )
        })
    }
}
