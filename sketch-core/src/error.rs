//! Error types for sketch operations.

use thiserror::Error;

/// Result type for sketch operations.
pub type SketchResult<T> = Result<T, SketchError>;

/// Errors that can occur at the parse boundary of the sketch core.
///
/// Normalization itself never fails; these only surface when decoding
/// events, documents or colours supplied by a caller.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Event log or document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A colour string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A raw event was structurally unusable.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}
