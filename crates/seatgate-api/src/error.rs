//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use seatgate_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status and error code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "bad_request"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "room_expired"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "seat_already_held_or_sold"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ErrorKind::Cache => (StatusCode::SERVICE_UNAVAILABLE, "cache_unavailable"),
        ErrorKind::LockStore | ErrorKind::Queue | ErrorKind::ServiceUnavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
        }
        ErrorKind::Database
        | ErrorKind::Internal
        | ErrorKind::Serialization
        | ErrorKind::Configuration => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let AppError { kind, message, .. } = self.0;
        let (status, error_code) = status_for(kind);

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(kind = %kind, error = %message, "Internal server error");
            "internal error".to_string()
        } else {
            if status.is_server_error() {
                tracing::warn!(kind = %kind, error = %message, "Backend unavailable");
            }
            message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
