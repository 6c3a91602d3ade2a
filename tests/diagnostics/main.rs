//! Diagnostics Facade Test Suite
//!
//! End-to-end tests for `TraceDiagnostics` over realistic query traces.
//!
//! ## Modules
//!
//! - `common`: trace fixtures and a counting metrics collector
//! - `accessors`: root normalization and summary accessors
//! - `memoization`: metrics computed once, absent results recomputed
//! - `aggregation`: totals and partition breakdown through the facade
//! - `relocation`: relocation status scan
//! - `serialization`: JSON and MessagePack output
//! - `concurrency`: shared facade across threads

mod common;

mod accessors;
mod aggregation;
mod concurrency;
mod memoization;
mod relocation;
mod serialization;
