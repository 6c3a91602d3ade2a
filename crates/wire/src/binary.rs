//! MessagePack encoding for trace trees
//!
//! Encodes the same [`TraceDocument`] as the JSON writer. Maps are written
//! with field names so either format decodes into the same generic value.

use crate::document::TraceDocument;
use crate::error::Result;
use qtrace_core::TraceNode;

/// Encode a trace tree to MessagePack
pub fn encode_trace_binary(trace: &TraceNode) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(&TraceDocument(trace))?)
}
