use crate::common::*;
use qtrace::prelude::*;
use qtrace_metrics::collect_server_side_metrics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn found_metrics_are_computed_once() {
    init_tracing();
    let collector = CountingCollector::default();
    let diagnostics = collector.install(TraceDiagnostics::new(query_trace()));

    let first = diagnostics.query_metrics().unwrap().unwrap();
    let second = diagnostics.query_metrics().unwrap().unwrap();

    assert_eq!(collector.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
}

#[test]
fn cached_value_matches_fresh_walk_bit_for_bit() {
    let trace = query_trace();
    let diagnostics = TraceDiagnostics::new(trace.clone());
    let _ = diagnostics.query_metrics().unwrap();
    let cached = diagnostics.query_metrics().unwrap().unwrap();
    let fresh = collect_server_side_metrics(&trace).unwrap().unwrap();

    assert_eq!(
        cached.cumulative_metrics.index_hit_ratio.to_bits(),
        fresh.cumulative_metrics.index_hit_ratio.to_bits()
    );
    assert_eq!(*cached, fresh);
}

#[test]
fn absent_metrics_are_not_cached() {
    let collector = CountingCollector::default();
    let trace = TraceBuilder::new("ReadItem")
        .child(TraceBuilder::new("Transport").datum(CLIENT_STATS_KEY, store_stats(&[(200, 0)])))
        .build();
    let diagnostics = collector.install(TraceDiagnostics::new(trace));

    assert!(diagnostics.query_metrics().unwrap().is_none());
    assert!(diagnostics.query_metrics().unwrap().is_none());
    assert_eq!(collector.calls(), 2);
}

#[test]
fn errors_are_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let diagnostics = TraceDiagnostics::new(query_trace()).with_collector(move |root| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(qtrace_core::Error::invalid_argument("backend_metrics"))
        } else {
            collect_server_side_metrics(root)
        }
    });

    assert!(diagnostics.query_metrics().unwrap_err().is_invalid_argument());
    assert!(diagnostics.query_metrics().unwrap().is_some());
    assert!(diagnostics.query_metrics().unwrap().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn metrics_datum_without_payload_is_invalid_argument() {
    init_tracing();
    let trace = TraceBuilder::new("ExecuteQuery")
        .child(page("Page 1", "0", backend(5, 1.0, 1), 1.0))
        .child(TraceBuilder::new("Page 2").datum(QUERY_METRICS_KEY, QueryMetricsDatum::default()))
        .build();
    let diagnostics = TraceDiagnostics::new(trace);

    let err = diagnostics.query_metrics().unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("backend_metrics"));
}
