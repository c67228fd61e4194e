//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use echo_ember_core::SiteSettings;

use crate::config::StorefrontConfig;
use crate::db::{RepositoryError, SettingsRepository};
use crate::services::auth::OAuthClient;

/// How long a read of the settings row stays fresh. Admin edits become
/// visible on the storefront within this window.
const SETTINGS_TTL: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    oauth: OAuthClient,
    // Single-entry cache keyed by unit; moka handles TTL and stampedes
    settings: Cache<(), SiteSettings>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let oauth = OAuthClient::new(config.oauth.clone(), &config.base_url);

        let settings = Cache::builder()
            .max_capacity(1)
            .time_to_live(SETTINGS_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                oauth,
                settings,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the OAuth client.
    #[must_use]
    pub fn oauth(&self) -> &OAuthClient {
        &self.inner.oauth
    }

    /// Current site settings, served from a short-lived cache.
    ///
    /// # Errors
    ///
    /// Returns the underlying repository error when the cache is cold and
    /// the database read fails.
    pub async fn site_settings(&self) -> Result<SiteSettings, RepositoryError> {
        self.inner
            .settings
            .try_get_with((), async {
                SettingsRepository::new(&self.inner.pool).get().await
            })
            .await
            .map_err(|e: Arc<RepositoryError>| match Arc::try_unwrap(e) {
                Ok(inner) => inner,
                Err(shared) => RepositoryError::DataCorruption(shared.to_string()),
            })
    }
}
