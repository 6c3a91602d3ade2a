//! Core error types
//!
//! Errors raised by the trace model and by the accumulators built on top of
//! it. Absent results (no metrics, no summary, no start time) are never
//! errors; they are modelled with `Option`.

use thiserror::Error;

/// Errors raised by qtrace core operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required argument was absent
    ///
    /// Signals a programmer error upstream (e.g. a metrics datum that was
    /// recorded without its backend payload). Never recovered locally.
    #[error("invalid argument: {name} must not be absent")]
    InvalidArgument {
        /// Name of the absent argument
        name: &'static str,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid-argument error for the named parameter
    pub fn invalid_argument(name: &'static str) -> Self {
        Error::InvalidArgument { name }
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}
