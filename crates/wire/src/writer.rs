//! Trace writer capability
//!
//! [`TraceWriter`] is the seam the diagnostics facade serializes through.
//! [`JsonTraceWriter`] is the stock implementation.

use crate::binary::encode_trace_binary;
use crate::error::Result;
use crate::json::encode_trace;
use qtrace_core::TraceNode;
use serde::{Deserialize, Serialize};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// UTF-8 JSON text
    #[default]
    Text,
    /// MessagePack
    Binary,
}

/// Writes a whole trace tree in a requested format
pub trait TraceWriter: Send + Sync {
    /// Encode `trace` and everything below it
    fn write_trace(&self, trace: &TraceNode, format: SerializationFormat) -> Result<Vec<u8>>;
}

/// Default writer: compact JSON text or MessagePack
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTraceWriter;

impl TraceWriter for JsonTraceWriter {
    fn write_trace(&self, trace: &TraceNode, format: SerializationFormat) -> Result<Vec<u8>> {
        match format {
            SerializationFormat::Text => Ok(encode_trace(trace)?.into_bytes()),
            SerializationFormat::Binary => encode_trace_binary(trace),
        }
    }
}
