//! # Error Types — Core Failure Modes
//!
//! Errors for canonicalization and encoding. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations; downstream
//! crates wrap these in their own enums with `#[from]`.

use thiserror::Error;

/// Error during canonical serialization or timestamp handling.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("canonical serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Timestamp string could not be parsed as ISO-8601.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error decoding wire-format binary material.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// Input was not valid base64url.
    #[error("invalid base64url: {0}")]
    InvalidBase64(String),

    /// Input bytes were not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(String),
}
