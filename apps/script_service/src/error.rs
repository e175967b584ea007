use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::identity_provider::IdentityError;
use crate::scripts::script_store::ScriptStoreError;

/// Error type returned by every HTTP handler.
///
/// Renders as `{"error": <message>, "code": <CODE>}` with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<ScriptStoreError> for AppError {
    fn from(err: ScriptStoreError) -> Self {
        match err {
            ScriptStoreError::Validation(msg) => AppError::Validation(msg),
            ScriptStoreError::NotFound(id) => AppError::NotFound(format!("Script {id} not found")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Validation(msg) => AppError::Validation(msg),
            IdentityError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            IdentityError::EmailExists => AppError::Conflict(err.to_string()),
            IdentityError::Upstream(msg) => AppError::Upstream(msg),
            IdentityError::Transport(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = match &self {
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}
