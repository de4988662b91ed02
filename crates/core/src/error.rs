use serde::Serialize;

/// Failure of the upload-and-record workflow.
///
/// Each variant carries the human-readable detail that is returned to the
/// caller verbatim. Branch on [`CoreError::kind`] rather than on the text.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The submission was rejected before any external I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Writing an uploaded file to object storage failed.
    #[error("Storage failed: {0}")]
    Storage(String),

    /// Inserting the feedback row failed.
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Closed set of error tags exposed to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    StorageError,
    PersistenceError,
}

impl ErrorKind {
    /// Wire code used in the JSON error envelope.
    pub fn code(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StorageError => "STORAGE_ERROR",
            Self::PersistenceError => "PERSISTENCE_ERROR",
        }
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Storage(_) => ErrorKind::StorageError,
            Self::Persistence(_) => ErrorKind::PersistenceError,
        }
    }

    /// The detail message without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Storage(msg) | Self::Persistence(msg) => msg,
        }
    }

    /// Whether the failure is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
