#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use feedback_api::config::ServerConfig;
use feedback_api::router::build_app_router;
use feedback_api::state::AppState;
use feedback_cloud::SupabaseConfig;
use feedback_core::feedback::{FeedbackRecord, NewFeedback};
use feedback_core::ports::{AdapterError, RecordAdapter, StorageAdapter, StoreOptions};
use feedback_core::upload::FeedbackSettings;

pub const BOUNDARY: &str = "----feedback-test-boundary-7d1c";

// ---------------------------------------------------------------------------
// Fake adapters
// ---------------------------------------------------------------------------

/// One recorded call to [`FakeStorage::store`].
#[derive(Debug, Clone)]
pub struct StoreCall {
    pub bucket: String,
    pub object_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub overwrite: bool,
}

/// In-memory storage adapter that records every call and can be told to fail
/// on the n-th one (1-based).
#[derive(Default)]
pub struct FakeStorage {
    calls: Mutex<Vec<StoreCall>>,
    fail_on_call: Option<usize>,
}

impl FakeStorage {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageAdapter for FakeStorage {
    async fn store(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        options: StoreOptions,
    ) -> Result<String, AdapterError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(StoreCall {
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
            overwrite: options.overwrite,
        });
        if self.fail_on_call == Some(calls.len()) {
            return Err(AdapterError::Rejected {
                status: 400,
                message: "Bucket not found".into(),
            });
        }
        Ok(object_name.to_string())
    }
}

/// In-memory record adapter that records inserted rows, or fails every
/// insert when built with [`FakeRecords::failing`].
#[derive(Default)]
pub struct FakeRecords {
    rows: Mutex<Vec<(String, NewFeedback)>>,
    fail: bool,
}

impl FakeRecords {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<(String, NewFeedback)> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordAdapter for FakeRecords {
    async fn insert(
        &self,
        table: &str,
        record: &NewFeedback,
    ) -> Result<Vec<FeedbackRecord>, AdapterError> {
        if self.fail {
            return Err(AdapterError::Rejected {
                status: 400,
                message: "null value in column \"isbn\" violates not-null constraint".into(),
            });
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push((table.to_string(), record.clone()));
        let mut persisted = FeedbackRecord::from(record.clone());
        persisted.id = Some(rows.len() as i64);
        Ok(vec![persisted])
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        static_dir: None,
        supabase: SupabaseConfig::new("http://127.0.0.1:54321", "test-key"),
        feedback: FeedbackSettings::default(),
    }
}

/// Everything a test needs to drive the app and inspect the fakes.
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<FakeStorage>,
    pub records: Arc<FakeRecords>,
}

/// Build the full application router (same middleware stack as production)
/// around the given fakes and config.
pub fn build_test_app_with(
    config: ServerConfig,
    storage: FakeStorage,
    records: FakeRecords,
) -> TestApp {
    let storage = Arc::new(storage);
    let records = Arc::new(records);
    let state = AppState::new(
        config.feedback.clone(),
        Arc::clone(&storage) as Arc<dyn StorageAdapter>,
        Arc::clone(&records) as Arc<dyn RecordAdapter>,
    );
    TestApp {
        router: build_app_router(state, &config),
        storage,
        records,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config(), FakeStorage::default(), FakeRecords::default())
}

pub fn build_test_app_with_settings(settings: FeedbackSettings) -> TestApp {
    let config = ServerConfig {
        feedback: settings,
        ..test_config()
    };
    build_test_app_with(config, FakeStorage::default(), FakeRecords::default())
}

pub fn build_test_app_with_static_dir(dir: PathBuf) -> TestApp {
    let config = ServerConfig {
        static_dir: Some(dir),
        ..test_config()
    };
    build_test_app_with(config, FakeStorage::default(), FakeRecords::default())
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// One part of a multipart/form-data body.
pub enum Part {
    Text(&'static str, &'static str),
    File {
        field: &'static str,
        filename: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

impl Part {
    pub fn file(field: &'static str, filename: &'static str, content_type: &'static str) -> Self {
        Part::File {
            field,
            filename,
            content_type,
            bytes: b"\xFF\xD8\xFF\xE0fake-image-bytes".to_vec(),
        }
    }

    pub fn sized_file(
        field: &'static str,
        filename: &'static str,
        content_type: &'static str,
        size: usize,
    ) -> Self {
        Part::File {
            field,
            filename,
            content_type,
            bytes: vec![0xAB; size],
        }
    }
}

/// Encode `parts` as a multipart/form-data body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// The three text fields of the standard scenario.
pub fn scenario_text_parts() -> Vec<Part> {
    vec![
        Part::Text("device_serial", "SN1"),
        Part::Text("phone_number", "555"),
        Part::Text("isbn", "978-0"),
    ]
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn post_feedback(app: Router, parts: Vec<Part>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/feedback")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(&parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Whether `name` looks like `<millis>-<10 base36 chars>[.<ext>]`.
pub fn is_generated_name(name: &str, ext: &str) -> bool {
    let stem = match name.strip_suffix(&format!(".{ext}")) {
        Some(stem) => stem,
        None => return false,
    };
    let Some((ts, token)) = stem.split_once('-') else {
        return false;
    };
    !ts.is_empty()
        && ts.chars().all(|c| c.is_ascii_digit())
        && token.len() == 10
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}
