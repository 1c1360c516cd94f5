//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into proper HTTP responses with JSON body and status
//! codes. Handlers return `Result<Json<T>, ApiError>` instead of losing error
//! context with bare `StatusCode`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use casenotes_service::ServiceError;
use casenotes_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message to
/// the client — no error detail leakage. Note content never appears in error
/// messages.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid input from caller.
    BadRequest(String),
    /// 404 Not Found — requested resource doesn't exist.
    NotFound(String),
    /// 422 Unprocessable Entity — valid syntax but semantic rejection,
    /// e.g. two "new session" requests racing for the same index.
    UnprocessableEntity(String),
    /// 500 Internal Server Error — unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(_) => Self::UnprocessableEntity(err.to_string()),
            StorageError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            _ => Self::Internal(err.into()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(e) => e.into(),
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
        }
    }
}
