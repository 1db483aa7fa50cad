//! # Error Types
//!
//! Errors shared across the stack. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for the Legal Metrology stack.
#[derive(Error, Debug)]
pub enum LmdError {
    /// A string did not name a known enum variant.
    #[error("unknown value: {0}")]
    UnknownValue(String),

    /// A field failed domain validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
