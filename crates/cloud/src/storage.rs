//! Object storage adapter (`/storage/v1/object`).

use async_trait::async_trait;
use feedback_core::ports::{AdapterError, StorageAdapter, StoreOptions};
use serde::Deserialize;

use crate::client::SupabaseClient;
use crate::error::SupabaseError;

/// Cache-Control applied to uploaded objects (matches the service SDK default).
const CACHE_CONTROL: &str = "max-age=3600";

/// Success body of an object upload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Full key including the bucket prefix, e.g. `images/123-abc.jpg`.
    #[serde(rename = "Key")]
    key: Option<String>,
}

/// [`StorageAdapter`] backed by the service's storage API.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: SupabaseClient,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Upload `bytes` and return the object path relative to the bucket.
    pub async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        options: StoreOptions,
    ) -> Result<String, SupabaseError> {
        let object_name = object_name.trim_start_matches('/');
        let response = self
            .client
            .post(&format!("/storage/v1/object/{bucket}/{object_name}"))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL)
            .header("x-upsert", if options.overwrite { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;

        let response = SupabaseClient::ensure_success(response).await?;
        let body: UploadResponse = response.json().await.map_err(|e| SupabaseError::Decode {
            endpoint: "storage",
            detail: e.to_string(),
        })?;

        Ok(object_path(bucket, object_name, body.key.as_deref()))
    }
}

/// Derive the bucket-relative path from the returned key.
fn object_path(bucket: &str, object_name: &str, key: Option<&str>) -> String {
    key.and_then(|k| k.strip_prefix(bucket))
        .and_then(|k| k.strip_prefix('/'))
        .filter(|k| !k.is_empty())
        .unwrap_or(object_name)
        .to_string()
}

#[async_trait]
impl StorageAdapter for SupabaseStorage {
    async fn store(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        options: StoreOptions,
    ) -> Result<String, AdapterError> {
        let path = self
            .upload(bucket, object_name, bytes, content_type, options)
            .await?;
        tracing::debug!(bucket, path = %path, "Object stored");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_strips_bucket_prefix() {
        assert_eq!(
            object_path("images", "1-a.jpg", Some("images/1-a.jpg")),
            "1-a.jpg"
        );
    }

    #[test]
    fn object_path_falls_back_to_requested_name() {
        assert_eq!(object_path("images", "1-a.jpg", None), "1-a.jpg");
        assert_eq!(object_path("images", "1-a.jpg", Some("other/1-a.jpg")), "1-a.jpg");
        assert_eq!(object_path("images", "1-a.jpg", Some("images/")), "1-a.jpg");
    }
}
