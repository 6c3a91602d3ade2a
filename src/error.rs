//! Unified error types for qtrace.
//!
//! This module provides a clean error type that wraps the core and wire
//! errors and presents a consistent interface to callers of the
//! diagnostics facade.

use thiserror::Error;

/// All qtrace errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was absent (programmer error upstream)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The trace writer failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The trace writer produced text that is not valid UTF-8
    #[error("encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for qtrace operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if serialization failed (writer error or bad UTF-8).
    pub fn is_serialization(&self) -> bool {
        matches!(self, Error::Serialization(_) | Error::Encoding(_))
    }
}

// Convert from core errors
impl From<qtrace_core::Error> for Error {
    fn from(e: qtrace_core::Error) -> Self {
        use qtrace_core::Error as CoreError;
        match e {
            CoreError::InvalidArgument { name } => {
                Error::InvalidArgument(format!("{} must not be absent", name))
            }
        }
    }
}

// Convert from wire errors
impl From<qtrace_wire::WireError> for Error {
    fn from(e: qtrace_wire::WireError) -> Self {
        Error::Serialization(e.to_string())
    }
}
