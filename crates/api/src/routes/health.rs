use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Static text returned by the liveness probe.
pub const LIVENESS_MESSAGE: &str = "Feedback intake backend is running";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /api -- unauthenticated liveness probe.
async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /health -- machine-readable service status.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mount the probe routes at their absolute paths.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(liveness))
        .route("/health", get(health_check))
}
