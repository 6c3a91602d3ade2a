//! Wire encoding for qtrace
//!
//! This crate implements the trace writer capability used by the diagnostics
//! facade. A trace tree can be written as:
//!
//! - compact JSON text ([`SerializationFormat::Text`])
//! - MessagePack ([`SerializationFormat::Binary`])
//!
//! Both formats encode the same [`TraceDocument`] view.
//!
//! ## Examples
//!
//! ```
//! use qtrace_core::TraceBuilder;
//! use qtrace_wire::{JsonTraceWriter, SerializationFormat, TraceWriter};
//!
//! let trace = TraceBuilder::new("ReadItem").build();
//! let bytes = JsonTraceWriter.write_trace(&trace, SerializationFormat::Text).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().starts_with(r#"{"name":"ReadItem""#));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary;
pub mod document;
pub mod error;
pub mod json;
pub mod writer;

// Re-export main types
pub use binary::encode_trace_binary;
pub use error::{Result, WireError};
pub use document::{duration_millis, TraceDocument, F64};
pub use json::encode_trace;
pub use writer::{JsonTraceWriter, SerializationFormat, TraceWriter};
