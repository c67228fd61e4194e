//! Admin account management.

use super::{CliError, connect};

/// Promote an existing account to `ADMIN`.
///
/// The account must already exist (sign in once first); this never creates
/// users.
///
/// # Errors
///
/// Returns `CliError::Invalid` when no account matches the email.
pub async fn promote(email: &str) -> Result<(), CliError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CliError::Invalid("email must not be empty".to_owned()));
    }

    let pool = connect().await?;

    let result = sqlx::query(
        "UPDATE shop.users SET role = 'ADMIN', updated_at = NOW() WHERE lower(email) = lower($1)",
    )
    .bind(email)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::Invalid(format!(
            "no account found for {email}; they must sign in once first"
        )));
    }

    tracing::info!(%email, "account promoted to ADMIN");
    Ok(())
}
