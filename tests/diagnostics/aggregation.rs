use crate::common::*;
use qtrace::prelude::*;
use std::time::Duration;

#[test]
fn totals_and_partitions() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    let metrics = diagnostics.query_metrics().unwrap().unwrap();

    let total = &metrics.cumulative_metrics;
    assert_eq!(total.retrieved_document_count, 50);
    assert_eq!(total.output_document_count, 50);
    assert_eq!(total.retrieved_document_size, 5000);
    assert_eq!(total.total_time, Duration::from_millis(12));
    // (10 * 1.0 + 30 * 0.5 + 10 * 0.0) / 50
    assert!((total.index_hit_ratio - 0.5).abs() < 1e-12);

    assert!((metrics.total_request_charge - 8.0).abs() < 1e-12);

    let ids: Vec<&str> = metrics
        .partitioned_metrics
        .iter()
        .map(|p| p.partition_id.as_str())
        .collect();
    assert_eq!(ids, vec!["0", "1"]);

    let range_zero = metrics.partition("0").unwrap();
    assert_eq!(range_zero.server_side_metrics.retrieved_document_count, 20);
    assert!((range_zero.server_side_metrics.index_hit_ratio - 0.5).abs() < 1e-12);
    assert!((range_zero.request_charge - 4.0).abs() < 1e-12);
}

#[test]
fn index_utilization_in_discovery_order_without_dedup() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    let metrics = diagnostics.query_metrics().unwrap().unwrap();
    let specs: Vec<&str> = metrics
        .index_utilization
        .utilized_single_indexes
        .iter()
        .map(|e| e.index_document_expression.as_str())
        .collect();
    assert_eq!(specs, vec!["/range0/?", "/range1/?", "/range0/?"]);
}

#[test]
fn nested_metrics_below_a_metrics_node_are_ignored() {
    let trace = TraceBuilder::new("ExecuteQuery")
        .child(
            page("Page 1", "0", backend(10, 1.0, 1), 1.0)
                .child(page("Retry", "0", backend(1_000, 0.0, 100), 50.0)),
        )
        .build();
    let diagnostics = TraceDiagnostics::new(trace);
    let metrics = diagnostics.query_metrics().unwrap().unwrap();
    assert_eq!(metrics.cumulative_metrics.retrieved_document_count, 10);
    assert_eq!(metrics.partitioned_metrics.len(), 1);
}

#[test]
fn partition_falls_back_to_node_id() {
    let node = TraceBuilder::new("Page 1").datum(
        QUERY_METRICS_KEY,
        QueryMetricsDatum::new(backend(3, 1.0, 1)),
    );
    let node_id = node.id();
    let diagnostics = TraceDiagnostics::new(TraceBuilder::new("q").child(node).build());
    let metrics = diagnostics.query_metrics().unwrap().unwrap();
    assert_eq!(metrics.partitioned_metrics[0].partition_id, node_id.to_string());
    assert!(metrics.partitioned_metrics[0].partition_key_range_id.is_none());
}
