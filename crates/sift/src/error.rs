//! Error types for the Sift library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sift operations.
///
/// Two failure modes are deliberately not errors: a response that fails
/// schema validation collapses to the operation's empty default inside the
/// gateway, and a response arriving for a dataset that is no longer active
/// collapses to a non-mutating `Stale` outcome inside the session.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Source text that cannot yield a dataset (no usable lines).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Terminal gateway failure: retries exhausted or a non-retryable
    /// provider error. The operation produced no data change.
    #[error("reasoning service failed after {attempts} attempt(s): {message}")]
    Gateway { attempts: u32, message: String },

    /// Unknown action id, or an action already in a terminal status.
    #[error("action error: {0}")]
    Action(String),

    /// Configuration error (missing API key, bad provider setup).
    #[error("configuration error: {0}")]
    Config(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
