//! JSON text encoding for trace trees
//!
//! Compact JSON of the [`TraceDocument`] view, via `serde_json`.

use crate::document::TraceDocument;
use crate::error::Result;
use qtrace_core::TraceNode;

/// Encode a trace tree to compact JSON text
pub fn encode_trace(trace: &TraceNode) -> Result<String> {
    Ok(serde_json::to_string(&TraceDocument(trace))?)
}
