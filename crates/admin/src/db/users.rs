//! User lookups for the admin sign-in flow.

use sqlx::PgPool;

use echo_ember_core::{Email, Role, UserId};

use super::RepositoryError;

/// The account fields the admin session needs.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub role: Role,
}

/// Repository for admin-side user access.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert an account from the OAuth profile and elevate it to `ADMIN`.
    ///
    /// Only called after the allow-list check passes; the storefront owns
    /// regular customer sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` for an invalid provider
    /// email, or `Database` on query failure.
    pub async fn upsert_admin(
        &self,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> Result<AdminAccount, RepositoryError> {
        let email = Email::parse(email).map_err(|e| {
            RepositoryError::DataCorruption(format!("identity provider email invalid: {e}"))
        })?;

        let row: (UserId, Option<String>, String) = sqlx::query_as(
            r"
            INSERT INTO shop.users (id, email, name, image, role)
            VALUES ($1, $2, $3, $4, 'ADMIN')
            ON CONFLICT (email) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, shop.users.name),
                image = COALESCE(EXCLUDED.image, shop.users.image),
                role = 'ADMIN',
                updated_at = NOW()
            RETURNING id, name, role
            ",
        )
        .bind(UserId::generate())
        .bind(email.as_str())
        .bind(name)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        let role: Role = row.2.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid role in database: {}", row.2))
        })?;

        Ok(AdminAccount {
            id: row.0,
            email,
            name: row.1,
            role,
        })
    }
}
