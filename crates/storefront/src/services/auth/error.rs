//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during the OAuth sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request to the identity provider failed.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("identity provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// The `state` parameter did not match the value stored in the session.
    #[error("oauth state mismatch")]
    StateMismatch,

    /// Provider response was missing a required field.
    #[error("malformed identity response: {0}")]
    MalformedResponse(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session read/write failed.
    #[error("session error")]
    Session,
}
