use crate::common::*;
use qtrace::prelude::*;
use std::time::Duration;

#[test]
fn elapsed_time_comes_from_root_when_built_from_leaf() {
    let trace = query_trace();
    let leaf = trace.child(2).unwrap();
    assert!(!leaf.is_root());

    let diagnostics = TraceDiagnostics::new(leaf);
    assert!(diagnostics.trace().is_root());
    assert_eq!(diagnostics.trace().name(), "ExecuteQuery");
    assert_eq!(diagnostics.client_elapsed_time(), Duration::from_millis(120));
}

#[test]
fn leaf_alone_keeps_whole_tree_reachable() {
    let leaf = query_trace().child(3).unwrap();
    assert_eq!(leaf.name(), "Page 3");

    let diagnostics = TraceDiagnostics::new(leaf);
    assert_eq!(diagnostics.trace().name(), "ExecuteQuery");
    assert_eq!(diagnostics.client_elapsed_time(), Duration::from_millis(120));
    assert_eq!(diagnostics.failed_request_count(), 2);

    let metrics = diagnostics.query_metrics().unwrap().unwrap();
    assert_eq!(metrics.partitioned_metrics.len(), 2);
    assert_eq!(metrics.cumulative_metrics.retrieved_document_count, 50);
}

#[test]
fn start_time_and_summary_values() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    assert_eq!(diagnostics.start_time(), Some(query_start()));
    assert_eq!(diagnostics.failed_request_count(), 2);

    let regions = diagnostics.contacted_regions().unwrap();
    let names: Vec<&str> = regions.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(names, vec!["West US", "East US"]);
}

#[test]
fn missing_summary_collapses_failures_to_zero() {
    let trace = TraceBuilder::new("ReadItem")
        .duration(Duration::from_millis(3))
        .build();
    let diagnostics = TraceDiagnostics::new(trace);
    assert!(diagnostics.contacted_regions().is_none());
    assert!(diagnostics.start_time().is_none());
    assert_eq!(diagnostics.failed_request_count(), 0);
}

#[test]
fn zero_failures_with_summary() {
    let trace = TraceBuilder::new("ReadItem")
        .summary(TraceSummary::default())
        .build();
    let diagnostics = TraceDiagnostics::new(trace);
    assert_eq!(diagnostics.failed_request_count(), 0);
    assert_eq!(diagnostics.contacted_regions(), Some(&[][..]));
}

#[test]
fn absent_trace_is_rejected() {
    let err = TraceDiagnostics::try_from(None).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("trace"));
}

#[test]
fn present_trace_converts() {
    let diagnostics = TraceDiagnostics::try_from(Some(query_trace())).unwrap();
    assert_eq!(diagnostics.failed_request_count(), 2);
}

#[test]
fn usable_through_trait_object() {
    let diagnostics: Box<dyn Diagnostics> = Box::new(TraceDiagnostics::new(query_trace()));
    assert_eq!(diagnostics.client_elapsed_time(), Duration::from_millis(120));
    assert!(diagnostics.query_metrics().unwrap().is_some());
}
