use feedback_core::ports::AdapterError;

/// Errors from the managed backend-as-a-service HTTP APIs.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service-provided message, or the raw body when none was given.
        message: String,
    },

    /// The configured service URL is not an absolute http(s) URL.
    #[error("Invalid service URL '{0}'")]
    InvalidUrl(String),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response from {endpoint}: {detail}")]
    Decode {
        endpoint: &'static str,
        detail: String,
    },
}

impl SupabaseError {
    /// Whether the service reported that the target already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Api { status: 409, .. })
    }
}

impl From<SupabaseError> for AdapterError {
    fn from(err: SupabaseError) -> Self {
        match err {
            e if e.is_conflict() => AdapterError::Conflict(e.to_string()),
            SupabaseError::Api { status, message } => AdapterError::Rejected { status, message },
            other => AdapterError::Transport(other.to_string()),
        }
    }
}
