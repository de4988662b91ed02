//! Feedback submission models.
//!
//! A submission arrives as a [`FeedbackForm`] (text fields plus buffered
//! files), is turned into a [`NewFeedback`] row once its files are stored,
//! and comes back from the record store as a [`FeedbackRecord`].

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Multipart field name of the required cover image.
pub const COVER_FIELD: &str = "cover";

/// Multipart field name of the optional copyright-page image.
pub const COPYRIGHT_FIELD: &str = "copyright";

/// Multipart names of the text fields copied into the row.
pub const TEXT_FIELDS: &[&str] = &["device_serial", "phone_number", "isbn"];

/// Whether `name` is one of [`TEXT_FIELDS`].
pub fn is_text_field(name: &str) -> bool {
    TEXT_FIELDS.contains(&name)
}

/// Which file slot of the form an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    Cover,
    Copyright,
}

impl FileSlot {
    /// Map a multipart field name to a slot. Unknown names yield `None`.
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            COVER_FIELD => Some(Self::Cover),
            COPYRIGHT_FIELD => Some(Self::Copyright),
            _ => None,
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            Self::Cover => COVER_FIELD,
            Self::Copyright => COPYRIGHT_FIELD,
        }
    }
}

impl std::fmt::Display for FileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A file part that passed validation and is held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as supplied by the client (may be mis-encoded).
    pub original_name: String,
    /// Declared content type, already checked against the allow-list.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything parsed out of one `POST /api/feedback` request.
#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    pub device_serial: Option<String>,
    pub phone_number: Option<String>,
    pub isbn: Option<String>,
    pub cover: Option<UploadedFile>,
    pub copyright: Option<UploadedFile>,
}

impl FeedbackForm {
    /// Store a text field by its multipart name. Unknown names are ignored
    /// and reported as `false`.
    pub fn set_text_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "device_serial" => &mut self.device_serial,
            "phone_number" => &mut self.phone_number,
            "isbn" => &mut self.isbn,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn file(&self, slot: FileSlot) -> Option<&UploadedFile> {
        match slot {
            FileSlot::Cover => self.cover.as_ref(),
            FileSlot::Copyright => self.copyright.as_ref(),
        }
    }

    /// Attach a file to its slot. The first file per slot wins; later ones
    /// are dropped and reported as `false`.
    pub fn attach(&mut self, slot: FileSlot, file: UploadedFile) -> bool {
        let target = match slot {
            FileSlot::Cover => &mut self.cover,
            FileSlot::Copyright => &mut self.copyright,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(file);
        true
    }
}

/// Row handed to the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedback {
    pub device_serial: Option<String>,
    pub phone_number: Option<String>,
    pub isbn: Option<String>,
    pub cover_image: String,
    pub copyright_image: Option<String>,
    pub created_at: Timestamp,
}

/// Row as persisted and echoed back by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default)]
    pub device_serial: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    pub cover_image: String,
    #[serde(default)]
    pub copyright_image: Option<String>,
    pub created_at: Timestamp,
}

impl From<NewFeedback> for FeedbackRecord {
    fn from(row: NewFeedback) -> Self {
        Self {
            id: None,
            device_serial: row.device_serial,
            phone_number: row.phone_number,
            isbn: row.isbn,
            cover_image: row.cover_image,
            copyright_image: row.copyright_image,
            created_at: row.created_at,
        }
    }
}
