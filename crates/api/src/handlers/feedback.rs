//! Handlers for feedback submission.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use feedback_core::feedback::{is_text_field, FeedbackForm, FeedbackRecord, FileSlot};
use feedback_core::upload::FeedbackSettings;
use feedback_core::workflow::submit_feedback;

use crate::error::AppResult;
use crate::response::SuccessResponse;
use crate::state::AppState;

/// POST /api/feedback
///
/// Accepts `multipart/form-data` with file fields `cover` (required) and
/// `copyright` (optional) plus text fields `device_serial`, `phone_number`
/// and `isbn`. Stores the images, inserts the row and returns the persisted
/// record(s).
pub async fn submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SuccessResponse<Vec<FeedbackRecord>>>> {
    let form = read_form(&state.settings, multipart?).await?;
    let rows = submit_feedback(
        state.storage.as_ref(),
        state.records.as_ref(),
        &state.settings,
        form,
    )
    .await?;
    Ok(Json(SuccessResponse::new(rows)))
}

/// Parse the multipart body into a [`FeedbackForm`].
///
/// File parts are checked against the content-type allow-list as soon as
/// their headers arrive and are buffered chunk by chunk under the size cap,
/// so a rejected part is never read in full.
pub async fn read_form(
    settings: &FeedbackSettings,
    mut multipart: Multipart,
) -> AppResult<FeedbackForm> {
    let mut form = FeedbackForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match FileSlot::from_field_name(&name) {
            Some(slot) => read_file(settings, &mut form, slot, field).await?,
            None if is_text_field(&name) => {
                let value = field.text().await?;
                form.set_text_field(&name, value);
            }
            // Dropped unread; the next `next_field` call skips its body.
            None => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_file(
    settings: &FeedbackSettings,
    form: &mut FeedbackForm,
    slot: FileSlot,
    mut field: Field<'_>,
) -> AppResult<()> {
    if form.file(slot).is_some() {
        tracing::debug!(field = %slot, "Ignoring repeated file field");
        return Ok(());
    }

    // Browsers send an empty, unnamed part for a file input left blank.
    if field.file_name() == Some("") {
        tracing::debug!(field = %slot, "Skipping empty file input");
        return Ok(());
    }

    let content_type = settings.check_content_type(slot, field.content_type())?;
    let original_name = field.file_name().unwrap_or_default().to_string();

    let mut buffer = settings.buffer_for(slot);
    while let Some(chunk) = field.chunk().await? {
        buffer.push(&chunk)?;
    }

    tracing::debug!(
        field = %slot,
        size = buffer.len(),
        content_type = %content_type,
        "File part received"
    );
    form.attach(slot, buffer.into_file(original_name, content_type));
    Ok(())
}
