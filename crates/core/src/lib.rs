//! Domain core of the feedback intake service.
//!
//! Holds the submission models, the upload policy, object naming, the
//! storage/record adapter traits and the upload-and-record workflow. Nothing
//! in here performs network I/O directly.

pub mod error;
pub mod feedback;
pub mod naming;
pub mod ports;
pub mod types;
pub mod upload;
pub mod workflow;
