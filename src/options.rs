//! Configuration for trace diagnostics.
//!
//! [`DiagnosticsOptions`] controls which store status counts as a partition
//! relocation and which format [`TraceDiagnostics::write_trace_default`]
//! produces.
//!
//! [`TraceDiagnostics::write_trace_default`]: crate::TraceDiagnostics::write_trace_default

use qtrace_core::StatusCode;
use qtrace_metrics::RelocationSignal;
use qtrace_wire::SerializationFormat;

/// Options for building a [`TraceDiagnostics`](crate::TraceDiagnostics).
///
/// Use the builder pattern to configure options:
///
/// ```
/// use qtrace::{DiagnosticsOptions, SerializationFormat};
/// use qtrace_core::StatusCode;
///
/// let opts = DiagnosticsOptions::new()
///     .relocation_status(StatusCode::GONE)
///     .relocation_sub_status(1002)
///     .format(SerializationFormat::Binary);
/// assert_eq!(opts.relocation_signal().sub_status, Some(1002));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsOptions {
    /// Status code that marks a relocated partition
    pub relocation_status: StatusCode,
    /// Sub-status to require alongside `relocation_status`; `None` = any
    pub relocation_sub_status: Option<u32>,
    /// Format used by `write_trace_default`
    pub format: SerializationFormat,
}

impl DiagnosticsOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relocation status code
    pub fn relocation_status(mut self, status: StatusCode) -> Self {
        self.relocation_status = status;
        self
    }

    /// Require a specific relocation sub-status
    pub fn relocation_sub_status(mut self, sub_status: u32) -> Self {
        self.relocation_sub_status = Some(sub_status);
        self
    }

    /// Set the default write format
    pub fn format(mut self, format: SerializationFormat) -> Self {
        self.format = format;
        self
    }

    /// Relocation signal these options describe
    pub fn relocation_signal(&self) -> RelocationSignal {
        RelocationSignal {
            status: self.relocation_status,
            sub_status: self.relocation_sub_status,
        }
    }
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        Self {
            relocation_status: StatusCode::GONE,
            relocation_sub_status: None,
            format: SerializationFormat::Text,
        }
    }
}
