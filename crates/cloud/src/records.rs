//! Record adapter for the service's REST data API (`/rest/v1/{table}`).

use async_trait::async_trait;
use feedback_core::feedback::{FeedbackRecord, NewFeedback};
use feedback_core::ports::{AdapterError, RecordAdapter};

use crate::client::SupabaseClient;
use crate::error::SupabaseError;

/// [`RecordAdapter`] that inserts rows through the REST data API and asks for
/// the inserted representation back.
#[derive(Debug, Clone)]
pub struct SupabaseRecords {
    client: SupabaseClient,
}

impl SupabaseRecords {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Insert one feedback row into `table` and return the persisted rows.
    pub async fn insert_feedback(
        &self,
        table: &str,
        record: &NewFeedback,
    ) -> Result<Vec<FeedbackRecord>, SupabaseError> {
        let response = self
            .client
            .post(&format!("/rest/v1/{table}"))
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?;

        let response = SupabaseClient::ensure_success(response).await?;
        response
            .json::<Vec<FeedbackRecord>>()
            .await
            .map_err(|e| SupabaseError::Decode {
                endpoint: "rest",
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl RecordAdapter for SupabaseRecords {
    async fn insert(
        &self,
        table: &str,
        record: &NewFeedback,
    ) -> Result<Vec<FeedbackRecord>, AdapterError> {
        let rows = self.insert_feedback(table, record).await?;
        tracing::debug!(table, rows = rows.len(), "Feedback row inserted");
        Ok(rows)
    }
}
