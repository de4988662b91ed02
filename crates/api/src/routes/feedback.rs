use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use feedback_core::upload::FeedbackSettings;

use crate::handlers::feedback;
use crate::state::AppState;

/// Feedback submission routes mounted under `/api`.
///
/// ```text
/// POST /feedback  -> submit
/// ```
///
/// The request body limit follows the upload cap: both file slots plus form
/// overhead, or no limit when uploads are unbounded.
pub fn router(settings: &FeedbackSettings) -> Router<AppState> {
    let body_limit = match settings.body_limit_bytes() {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/feedback", post(feedback::submit))
        .layer(body_limit)
}
