//! HTTP adapters for the managed backend-as-a-service.
//!
//! [`SupabaseStorage`] implements the storage port against the object
//! storage API and [`SupabaseRecords`] implements the record port against the
//! REST data API. Both share a [`SupabaseClient`].

pub mod client;
pub mod error;
pub mod records;
pub mod storage;

pub use client::{SupabaseClient, SupabaseConfig};
pub use error::SupabaseError;
pub use records::SupabaseRecords;
pub use storage::SupabaseStorage;
