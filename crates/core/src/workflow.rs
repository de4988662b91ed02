//! The upload-and-record workflow.
//!
//! ```text
//! Validating -> StoringCover -> StoringCopyright? -> Persisting -> Done
//!      \______________\________________\________________\-> Failed
//! ```
//!
//! Steps run strictly in order and nothing is retried. A failure after the
//! cover has been stored leaves the stored object(s) in place: there is no
//! compensating delete.

use std::fmt;

use crate::error::CoreError;
use crate::feedback::{FeedbackForm, FeedbackRecord, FileSlot, NewFeedback, UploadedFile};
use crate::naming::{recover_latin1_filename, safe_object_name};
use crate::ports::{RecordAdapter, StorageAdapter, StoreOptions};
use crate::upload::{require_cover, FeedbackSettings, COVER_REQUIRED};

/// Stage of a single workflow run, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Validating,
    StoringCover,
    StoringCopyright,
    Persisting,
    Done,
}

impl WorkflowStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::StoringCover => "storing_cover",
            Self::StoringCopyright => "storing_copyright",
            Self::Persisting => "persisting",
            Self::Done => "done",
        }
    }

    fn storing(slot: FileSlot) -> Self {
        match slot {
            FileSlot::Cover => Self::StoringCover,
            FileSlot::Copyright => Self::StoringCopyright,
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the whole workflow for one submission.
///
/// Returns the persisted row(s) as reported by the record store.
pub async fn submit_feedback(
    storage: &dyn StorageAdapter,
    records: &dyn RecordAdapter,
    settings: &FeedbackSettings,
    form: FeedbackForm,
) -> Result<Vec<FeedbackRecord>, CoreError> {
    let mut stage = WorkflowStage::Validating;
    tracing::debug!(stage = %stage, "Feedback workflow started");

    if let Err(e) = validate_form(settings, &form) {
        tracing::warn!(stage = %stage, error = %e, "Feedback submission rejected");
        return Err(e);
    }

    let FeedbackForm {
        device_serial,
        phone_number,
        isbn,
        cover,
        copyright,
    } = form;
    let cover = cover.ok_or_else(|| CoreError::Validation(COVER_REQUIRED.into()))?;

    stage = WorkflowStage::StoringCover;
    let cover_image = store_file(storage, settings, FileSlot::Cover, cover).await?;

    let copyright_image = match copyright {
        Some(file) => {
            stage = WorkflowStage::StoringCopyright;
            Some(store_file(storage, settings, FileSlot::Copyright, file).await?)
        }
        None => None,
    };
    tracing::debug!(stage = %stage, "Uploads stored");

    stage = WorkflowStage::Persisting;
    let row = NewFeedback {
        device_serial,
        phone_number,
        isbn,
        cover_image,
        copyright_image,
        created_at: chrono::Utc::now(),
    };

    let persisted = records
        .insert(&settings.table_name, &row)
        .await
        .map_err(|e| {
            tracing::error!(
                stage = %stage,
                table = %settings.table_name,
                cover_image = %row.cover_image,
                copyright_image = ?row.copyright_image,
                error = %e,
                "Failed to persist feedback; stored files are left orphaned"
            );
            CoreError::Persistence(e.to_string())
        })?;

    stage = WorkflowStage::Done;
    tracing::info!(
        stage = %stage,
        rows = persisted.len(),
        cover_image = %row.cover_image,
        "Feedback recorded"
    );
    Ok(persisted)
}

/// Validating stage: cover present, every file within policy.
///
/// The HTTP layer already applies the same checks while streaming; this keeps
/// the workflow safe for callers that build a [`FeedbackForm`] directly.
pub fn validate_form(settings: &FeedbackSettings, form: &FeedbackForm) -> Result<(), CoreError> {
    require_cover(form)?;

    for slot in [FileSlot::Cover, FileSlot::Copyright] {
        if let Some(file) = form.file(slot) {
            settings.check_content_type(slot, Some(&file.content_type))?;
            settings.check_size(slot, file.bytes.len() as u64)?;
        }
    }
    Ok(())
}

async fn store_file(
    storage: &dyn StorageAdapter,
    settings: &FeedbackSettings,
    slot: FileSlot,
    file: UploadedFile,
) -> Result<String, CoreError> {
    let stage = WorkflowStage::storing(slot);
    let object_name = safe_object_name(&file.original_name);
    tracing::debug!(
        stage = %stage,
        original_name = %recover_latin1_filename(&file.original_name),
        object_name = %object_name,
        size = file.bytes.len(),
        content_type = %file.content_type,
        "Storing upload"
    );

    storage
        .store(
            &settings.bucket_name,
            &object_name,
            file.bytes,
            &file.content_type,
            StoreOptions::default(),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                stage = %stage,
                bucket = %settings.bucket_name,
                object_name = %object_name,
                error = %e,
                "Failed to store upload"
            );
            CoreError::Storage(e.to_string())
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
