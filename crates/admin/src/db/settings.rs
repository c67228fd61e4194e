//! Site settings repository (read and overwrite).

use rust_decimal::Decimal;
use sqlx::PgPool;

use echo_ember_core::SiteSettings;

use super::RepositoryError;

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

const SETTINGS_COLUMNS: &str = "store_name, support_email, shipping_cost, \
     free_shipping_threshold, announcement_text, maintenance_mode";

/// Repository for the singleton settings row.
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
        let row: Option<SettingsRow> = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM shop.site_settings WHERE id = 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        row.map(SiteSettings::from).ok_or_else(|| {
            RepositoryError::DataCorruption(
                "site_settings seed row missing; run migrations".to_owned(),
            )
        })
    }

    /// Overwrite the singleton row. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, settings: &SiteSettings) -> Result<SiteSettings, RepositoryError> {
        let row: SettingsRow = sqlx::query_as(&format!(
            r"
            UPDATE shop.site_settings
            SET store_name = $1, support_email = $2, shipping_cost = $3,
                free_shipping_threshold = $4, announcement_text = $5,
                maintenance_mode = $6, updated_at = NOW()
            WHERE id = 1
            RETURNING {SETTINGS_COLUMNS}
            "
        ))
        .bind(&settings.store_name)
        .bind(&settings.support_email)
        .bind(settings.shipping_cost)
        .bind(settings.free_shipping_threshold)
        .bind(&settings.announcement_text)
        .bind(settings.maintenance_mode)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
