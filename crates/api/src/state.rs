use std::sync::Arc;

use feedback_core::ports::{RecordAdapter, StorageAdapter};
use feedback_core::upload::FeedbackSettings;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`. The adapters are
/// injected here rather than created per request so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    /// Upload policy, bucket and table.
    pub settings: Arc<FeedbackSettings>,
    /// Object storage for uploaded images.
    pub storage: Arc<dyn StorageAdapter>,
    /// Record store for feedback rows.
    pub records: Arc<dyn RecordAdapter>,
}

impl AppState {
    pub fn new(
        settings: FeedbackSettings,
        storage: Arc<dyn StorageAdapter>,
        records: Arc<dyn RecordAdapter>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            storage,
            records,
        }
    }
}
