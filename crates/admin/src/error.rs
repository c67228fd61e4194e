//! Unified error handling with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::media::MediaError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Media host operation failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Sign-in flow failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not an authenticated admin.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request was well-formed but semantically invalid.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures go to Sentry; client mistakes stay local
        if matches!(
            self,
            Self::Database(
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            ) | Self::Media(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::IllegalTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Media(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::StateMismatch => StatusCode::BAD_REQUEST,
                AuthError::NotAdmin => StatusCode::FORBIDDEN,
                AuthError::Http(_) | AuthError::Provider { .. } => StatusCode::BAD_GATEWAY,
                AuthError::MalformedResponse(_)
                | AuthError::Repository(_)
                | AuthError::Session => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::IllegalTransition { from, to } => {
                    format!("cannot move order from {from} to {to}")
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error".to_owned()
                }
            },
            Self::Media(_) => "Media host error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::StateMismatch => "Sign-in session expired, please try again".to_owned(),
                AuthError::NotAdmin => "This account does not have admin access".to_owned(),
                AuthError::Http(_) | AuthError::Provider { .. } => {
                    "Identity provider unavailable".to_owned()
                }
                AuthError::MalformedResponse(_)
                | AuthError::Repository(_)
                | AuthError::Session => "Internal server error".to_owned(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Unprocessable(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use echo_ember_core::OrderStatus;

    use super::*;

    #[test]
    fn illegal_transition_maps_to_422() {
        let err = AppError::Database(RepositoryError::IllegalTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_admin_maps_to_403() {
        let err = AppError::Auth(AuthError::NotAdmin);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn media_failures_are_bad_gateway() {
        let err = AppError::Media(MediaError::Parse("bad json".to_owned()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
