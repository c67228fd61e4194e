//! Admin session state.

use serde::{Deserialize, Serialize};

use echo_ember_core::{Email, UserId};

/// The signed-in admin as stored in the session.
///
/// Only ever written by the OAuth callback, and only for allow-listed
/// accounts whose role is `ADMIN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
}

/// Session storage keys.
pub mod keys {
    /// Key for the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
    /// Key for the in-flight OAuth state nonce.
    pub const OAUTH_STATE: &str = "oauth_state";
}
