//! Request handlers.
//!
//! Handlers translate HTTP input into calls on `feedback_core` and map errors
//! via [`crate::error::AppError`].

pub mod feedback;
