//! Upload validation: content-type allow-list, per-file size cap and the
//! required-cover rule.
//!
//! All checks are pure. The size cap is enforced incrementally through
//! [`UploadBuffer`] so an oversized part is rejected while it is still being
//! read, never after it has been buffered whole.

use crate::error::CoreError;
use crate::feedback::{FeedbackForm, FileSlot, UploadedFile};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default per-file upload cap (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Default image types accepted for both file slots.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Default object-storage bucket.
pub const DEFAULT_BUCKET_NAME: &str = "images";

/// Default table for feedback rows.
pub const DEFAULT_TABLE_NAME: &str = "feedback";

/// Error detail returned when the `cover` part is missing.
pub const COVER_REQUIRED: &str = "cover image required";

/// Headroom for text fields and multipart framing on top of the file caps.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables of the upload-and-record workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSettings {
    /// Per-file cap in bytes; `None` means unbounded.
    pub max_upload_bytes: Option<u64>,
    /// Accepted content types, stored normalized (lowercase, no parameters).
    pub allowed_content_types: Vec<String>,
    pub bucket_name: String,
    pub table_name: String,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl FeedbackSettings {
    /// Replace the allow-list, normalizing and de-duplicating entries.
    pub fn with_allowed_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for t in types {
            let t = normalize_content_type(t.as_ref());
            if !t.is_empty() && !normalized.contains(&t) {
                normalized.push(t);
            }
        }
        self.allowed_content_types = normalized;
        self
    }

    /// Check a part's declared content type against the allow-list.
    ///
    /// Returns the normalized type on success.
    pub fn check_content_type(
        &self,
        slot: FileSlot,
        content_type: Option<&str>,
    ) -> Result<String, CoreError> {
        let declared = content_type.map(normalize_content_type).unwrap_or_default();
        if declared.is_empty() {
            return Err(CoreError::Validation(format!(
                "{slot} image has no content type; allowed: {}",
                self.allowed_content_types.join(", ")
            )));
        }
        if self.allowed_content_types.contains(&declared) {
            Ok(declared)
        } else {
            Err(CoreError::Validation(format!(
                "only image files are allowed ({}), got '{declared}' for {slot}",
                self.allowed_content_types.join(", ")
            )))
        }
    }

    /// Reject a file of `len` bytes that exceeds the configured cap.
    pub fn check_size(&self, slot: FileSlot, len: u64) -> Result<(), CoreError> {
        check_size(slot, self.max_upload_bytes, len)
    }

    /// Start buffering a file part for `slot` under the configured cap.
    pub fn buffer_for(&self, slot: FileSlot) -> UploadBuffer {
        UploadBuffer::new(slot, self.max_upload_bytes)
    }

    /// Request body limit covering both file slots plus form overhead.
    ///
    /// `None` when uploads are unbounded.
    pub fn body_limit_bytes(&self) -> Option<usize> {
        self.max_upload_bytes.map(|max| {
            let total = max.saturating_mul(2).saturating_add(FORM_OVERHEAD_BYTES);
            usize::try_from(total).unwrap_or(usize::MAX)
        })
    }
}

fn check_size(slot: FileSlot, limit: Option<u64>, len: u64) -> Result<(), CoreError> {
    match limit {
        Some(limit) if len > limit => Err(CoreError::Validation(format!(
            "{slot} image exceeds the {limit} byte upload limit"
        ))),
        _ => Ok(()),
    }
}

/// Lowercase a content type and drop any `; param=...` suffix.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Buffering
// ---------------------------------------------------------------------------

/// In-memory accumulator for one file part that enforces the size cap.
#[derive(Debug)]
pub struct UploadBuffer {
    slot: FileSlot,
    limit: Option<u64>,
    bytes: Vec<u8>,
}

impl UploadBuffer {
    pub fn new(slot: FileSlot, limit: Option<u64>) -> Self {
        Self {
            slot,
            limit,
            bytes: Vec::new(),
        }
    }

    /// Append a chunk, failing as soon as the running total exceeds the cap.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), CoreError> {
        let total = self.bytes.len() as u64 + chunk.len() as u64;
        check_size(self.slot, self.limit, total)?;
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_file(self, original_name: String, content_type: String) -> UploadedFile {
        UploadedFile {
            original_name,
            content_type,
            bytes: self.bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Form-level checks
// ---------------------------------------------------------------------------

/// Reject a form without a cover image.
pub fn require_cover(form: &FeedbackForm) -> Result<&UploadedFile, CoreError> {
    form.cover
        .as_ref()
        .ok_or_else(|| CoreError::Validation(COVER_REQUIRED.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
