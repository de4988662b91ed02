//! Response envelope types for API handlers.
//!
//! Every JSON response from the feedback API carries a `success` flag:
//! `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": ..., "code": ... }`.

use feedback_core::error::ErrorKind;
use serde::Serialize;

/// Success envelope wrapping any serializable payload.
///
/// ```ignore
/// Ok(Json(SuccessResponse::new(rows)))
/// ```
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope produced by [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable message from the underlying error.
    pub error: String,
    /// Machine-readable kind, e.g. `STORAGE_ERROR`.
    pub code: &'static str,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, error: String) -> Self {
        Self {
            success: false,
            error,
            code: kind.code(),
        }
    }
}
