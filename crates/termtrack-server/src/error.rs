//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use termtrack_core::TermtrackError;

/// An error ready to leave the API: a status code plus the message for
/// the `{"detail": ...}` response body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn not_acceptable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_ACCEPTABLE, detail)
    }

    /// Maps a gateway failure to a 500 with a flow-specific message.
    /// Every other error keeps its default mapping.
    pub fn or_database(err: TermtrackError, detail: &str) -> Self {
        match err {
            TermtrackError::Database(source) => {
                tracing::error!(error = %source, "Database failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
            other => Self::from(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<TermtrackError> for ApiError {
    fn from(err: TermtrackError) -> Self {
        match err {
            TermtrackError::AuthenticationFailed { reason } => {
                Self::new(StatusCode::UNAUTHORIZED, reason)
            }
            TermtrackError::AuthorizationDenied { reason } => {
                Self::new(StatusCode::FORBIDDEN, reason)
            }
            TermtrackError::NotFound { entity, .. } => {
                Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            TermtrackError::AlreadyExists { entity } => {
                Self::new(StatusCode::CONFLICT, format!("{entity} already exists"))
            }
            TermtrackError::Validation { message } => Self::new(StatusCode::BAD_REQUEST, message),
            TermtrackError::Database(detail) => {
                tracing::error!(error = %detail, "Database failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred")
            }
            TermtrackError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred")
            }
        }
    }
}
