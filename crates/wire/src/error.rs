//! Wire error types

use thiserror::Error;

/// Errors raised while writing a trace
#[derive(Debug, Error)]
pub enum WireError {
    /// The binary encoder rejected the document
    #[error("binary encoding failed: {0}")]
    Binary(#[from] rmp_serde::encode::Error),

    /// The JSON encoder rejected the document
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
