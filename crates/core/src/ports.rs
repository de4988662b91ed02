//! Seams to the external storage and record services.
//!
//! The workflow only talks to these traits. Production wires in the HTTP
//! adapters from `feedback-cloud`; tests wire in in-memory fakes.

use async_trait::async_trait;

use crate::feedback::{FeedbackRecord, NewFeedback};

/// Options for a single object write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Replace an existing object with the same name instead of failing.
    pub overwrite: bool,
}

/// Error returned by an adapter. The `Display` text is what ends up in the
/// API error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The object already exists and overwrite was not requested.
    #[error("{0}")]
    Conflict(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

/// Object storage for uploaded files.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Store `bytes` as `object_name` inside `bucket` and return the stored
    /// object's path.
    async fn store(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        options: StoreOptions,
    ) -> Result<String, AdapterError>;
}

/// Relational store for feedback rows.
#[async_trait]
pub trait RecordAdapter: Send + Sync {
    /// Insert `record` into `table` and return the persisted row(s).
    async fn insert(
        &self,
        table: &str,
        record: &NewFeedback,
    ) -> Result<Vec<FeedbackRecord>, AdapterError>;
}
