use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::scheduling::{ClockError, ScheduleError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input; the caller's fault, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The requested interval lost a race or no longer fits. The caller
    /// should re-fetch availability and pick another slot; the engine never
    /// retries on its own.
    #[error("slot unavailable: {0}")]
    SlotUnavailable(String),

    /// Invalid state transition or other business-rule conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ClockError> for AppError {
    fn from(err: ClockError) -> Self {
        match err {
            ClockError::InvalidFormat(_) | ClockError::OutOfRange(_) => {
                AppError::Validation(err.to_string())
            }
            // Bad stored timezone or unprojectable instant is our data, not
            // the caller's input.
            ClockError::UnknownTimezone(_) | ClockError::UnrepresentableInstant => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        // Stored hours that fail schedule validation are corrupt data.
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::SlotUnavailable(_) => (StatusCode::CONFLICT, "Slot unavailable"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Resource conflict"),
            AppError::Database(err) => match err {
                DatabaseError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                DatabaseError::Conflict => (StatusCode::CONFLICT, "Resource conflict"),
                DatabaseError::Serialization | DatabaseError::Connection(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable",
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                ),
            },
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
