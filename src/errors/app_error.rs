use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application error type
///
/// Maps the supervisor's failure taxonomy onto HTTP responses:
/// provisioning and spawn failures are server errors, unknown rooms and
/// process identifiers are not-found errors.
#[derive(Debug)]
pub enum AppError {
    /// Room or token request against the transport provider failed
    Provisioning(String),
    /// Bot subprocess spawn failed
    Start(String),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Provisioning(msg) => {
                tracing::error!("Provisioning error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Provisioning failed")
            }
            AppError::Start(msg) => {
                tracing::error!("Start error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to start bot")
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "Resource not found")
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Provisioning(msg) => write!(f, "Provisioning failed: {msg}"),
            AppError::Start(msg) => write!(f, "Failed to start bot: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal server error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
