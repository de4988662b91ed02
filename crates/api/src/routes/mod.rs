pub mod feedback;
pub mod health;

use axum::Router;
use feedback_core::upload::FeedbackSettings;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /feedback        submit feedback (multipart)
/// ```
///
/// The `/api` liveness probe itself lives in [`health::router`].
pub fn api_routes(settings: &FeedbackSettings) -> Router<AppState> {
    Router::new().merge(feedback::router(settings))
}
