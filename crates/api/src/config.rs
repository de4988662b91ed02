use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use feedback_cloud::SupabaseConfig;
use feedback_core::upload::{
    FeedbackSettings, DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_BUCKET_NAME,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TABLE_NAME,
};

/// Values of `MAX_UPLOAD_BYTES` that disable the per-file cap.
const UNBOUNDED_VALUES: &[&str] = &["unlimited", "none", "unbounded"];

/// Error raised while loading [`ServerConfig`]. Startup aborts on any of
/// these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the service URL and key has a default suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*` allows any.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory served as the router fallback (e.g. the HTML form).
    pub static_dir: Option<PathBuf>,
    /// Connection to the storage/record service.
    pub supabase: SupabaseConfig,
    /// Upload policy, bucket and table.
    pub feedback: FeedbackSettings,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                                     |
    /// |-------------------------|---------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                   |
    /// | `PORT`                  | `3000`                                      |
    /// | `CORS_ORIGINS`          | `*`                                         |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                        |
    /// | `STATIC_DIR`            | unset                                       |
    /// | `SUPABASE_URL`          | required                                    |
    /// | `SUPABASE_KEY`          | required                                    |
    /// | `SERVICE_TIMEOUT_SECS`  | `30`                                        |
    /// | `STORAGE_BUCKET`        | `images`                                    |
    /// | `FEEDBACK_TABLE`        | `feedback`                                  |
    /// | `MAX_UPLOAD_BYTES`      | `5242880` (`unlimited` disables the cap)    |
    /// | `ALLOWED_CONTENT_TYPES` | `image/jpeg,image/jpg,image/png,image/webp` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host: IpAddr = parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or("PORT", get("PORT"), 3000)?;

        let cors_origins = split_list(get("CORS_ORIGINS").as_deref().unwrap_or("*"));
        for origin in cors_origins.iter().filter(|o| o.as_str() != "*") {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs: u64 =
            parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 30)?;
        let static_dir = get("STATIC_DIR").map(PathBuf::from);

        let url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "SUPABASE_URL",
                value: url,
                reason: "must start with http:// or https://".into(),
            });
        }
        let key = get("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
        let service_timeout_secs: u64 =
            parse_or("SERVICE_TIMEOUT_SECS", get("SERVICE_TIMEOUT_SECS"), 30)?;
        let supabase = SupabaseConfig {
            url,
            key,
            timeout: Duration::from_secs(service_timeout_secs),
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            None => Some(DEFAULT_MAX_UPLOAD_BYTES),
            Some(v) if UNBOUNDED_VALUES.contains(&v.to_ascii_lowercase().as_str()) => None,
            Some(v) => Some(parse_or("MAX_UPLOAD_BYTES", Some(v), DEFAULT_MAX_UPLOAD_BYTES)?),
        };

        let allowed = get("ALLOWED_CONTENT_TYPES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_CONTENT_TYPES
                    .iter()
                    .map(|t| t.to_string())
                    .collect()
            });

        let feedback = FeedbackSettings {
            max_upload_bytes,
            bucket_name: get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET_NAME.into()),
            table_name: get("FEEDBACK_TABLE").unwrap_or_else(|| DEFAULT_TABLE_NAME.into()),
            ..FeedbackSettings::default()
        }
        .with_allowed_content_types(allowed);

        if feedback.allowed_content_types.is_empty() {
            return Err(ConfigError::Invalid {
                var: "ALLOWED_CONTENT_TYPES",
                value: String::new(),
                reason: "at least one content type is required".into(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            static_dir,
            supabase,
            feedback,
        })
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value: v,
        }),
    }
}
