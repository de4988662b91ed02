/// Server-assigned primary keys are PostgreSQL BIGINT identities.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
