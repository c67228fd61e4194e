//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use echo_ember_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;
use crate::services::auth::IdentityProfile;

/// Raw user row as stored in `shop.users`.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    name: Option<String>,
    image: Option<String>,
    role: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = row.role.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid role in database: {}", row.role))
        })?;

        Ok(Self {
            id: row.id,
            email,
            name: row.name,
            image: row.image,
            role,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, name, image, role, phone, address, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored email or role is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM shop.users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Upsert a user from an OAuth identity profile.
    ///
    /// Looks up by email; creates the account on first sign-in. Name and
    /// avatar refresh from the provider on every sign-in. The role is set to
    /// `ADMIN` when `elevate` is true (allow-list match) and never demoted
    /// here - demotion is an operator action.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_from_identity(
        &self,
        profile: &IdentityProfile,
        elevate: bool,
    ) -> Result<User, RepositoryError> {
        let email = Email::parse(&profile.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("identity provider email invalid: {e}"))
        })?;

        let role = if elevate { Role::Admin } else { Role::Customer };

        let row: UserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shop.users (id, email, name, image, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, shop.users.name),
                image = COALESCE(EXCLUDED.image, shop.users.image),
                role = CASE WHEN EXCLUDED.role = 'ADMIN' THEN 'ADMIN' ELSE shop.users.role END,
                updated_at = NOW()
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(UserId::generate())
        .bind(email.as_str())
        .bind(&profile.name)
        .bind(&profile.picture)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await?;

        User::try_from(row)
    }

    /// Update the user's profile fields (name, phone, address).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r"
            UPDATE shop.users
            SET name = $2, phone = $3, address = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), User::try_from)
    }
}
