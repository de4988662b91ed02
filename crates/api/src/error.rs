use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use feedback_core::error::{CoreError, ErrorKind};

use crate::response::ErrorResponse;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for workflow failures and adds the HTTP-specific ways a
/// request can be malformed. Implements [`IntoResponse`] to produce the
/// `{ "success": false, "error": ..., "code": ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A workflow error from `feedback_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The body could not be read as multipart/form-data.
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The request was not multipart/form-data at all.
    #[error("Expected multipart/form-data: {0}")]
    NotMultipart(#[from] MultipartRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Core(core) => {
                let status = if core.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, core.kind(), core.detail().to_string())
            }
            // Includes the request body limit: reported as 400, not 413.
            AppError::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                ErrorKind::ValidationError,
                err.body_text(),
            ),
            AppError::NotMultipart(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorKind::ValidationError,
                rejection.body_text(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, code = kind.code(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, code = kind.code(), error = %message, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::new(kind, message))).into_response()
    }
}
