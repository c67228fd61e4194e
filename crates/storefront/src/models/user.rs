//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use echo_ember_core::{Email, Role, UserId};

/// A shop user (domain type).
///
/// Created on first OAuth sign-in. Contact/shipping defaults are filled in
/// by profile edits and opportunistically by checkout.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique, from the identity provider).
    pub email: Email,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL from the identity provider.
    pub image: Option<String>,
    /// Account role.
    pub role: Role,
    /// Default contact phone.
    pub phone: Option<String>,
    /// Default shipping address (free text).
    pub address: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
