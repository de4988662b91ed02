//! Shared HTTP plumbing for the managed backend-as-a-service.
//!
//! Both adapters talk to the same deployment with the same service key, so
//! they share one [`SupabaseClient`] (and through it one `reqwest` connection
//! pool).

use std::time::Duration;

use reqwest::RequestBuilder;

use crate::error::SupabaseError;

/// Default timeout for a single call to the service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the service.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service (or anon) API key sent as both `apikey` and bearer token.
    pub key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authenticated HTTP client bound to one service deployment.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SupabaseClient {
    /// Build a client from `config`.
    ///
    /// Fails if the URL is not an absolute `http`/`https` URL or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SupabaseError::InvalidUrl(config.url.clone()));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            key: config.key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a `POST` to `path` (relative to the base URL) with auth headers.
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Turn a non-2xx response into [`SupabaseError::Api`], passing 2xx
    /// responses through unchanged.
    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        Err(SupabaseError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pull the human-readable message out of a service error body.
///
/// Both the storage and PostgREST APIs answer with a JSON object carrying
/// `message` (and storage additionally `error`). Anything else is returned
/// raw.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "error", "msg"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        })
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
