//! Shared fixtures for the diagnostics suite.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use qtrace::prelude::*;
use qtrace_core::{IndexUtilizationInfo, SingleIndexUtilizationEntity};
use qtrace_metrics::collect_server_side_metrics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub fn query_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
}

/// Backend metrics where every retrieved document is output.
pub fn backend(retrieved: u64, hit_ratio: f64, total_ms: u64) -> BackendMetrics {
    BackendMetrics {
        retrieved_document_count: retrieved,
        retrieved_document_size: retrieved * 100,
        output_document_count: retrieved,
        output_document_size: retrieved * 80,
        index_hit_ratio: hit_ratio,
        total_time: Duration::from_millis(total_ms),
        ..BackendMetrics::EMPTY
    }
}

pub fn page(name: &str, range: &str, metrics: BackendMetrics, charge: f64) -> TraceBuilder {
    let info = IndexUtilizationInfo {
        utilized_single_indexes: vec![SingleIndexUtilizationEntity {
            filter_expression: "(ROOT.tenant = \"contoso\")".into(),
            index_document_expression: format!("/range{}/?", range),
            filter_expression_precision: true,
            index_plan_full_fidelity: true,
            index_impact_score: "High".into(),
        }],
        ..IndexUtilizationInfo::default()
    };
    TraceBuilder::new(name)
        .component(TraceComponent::Query)
        .datum(
            QUERY_METRICS_KEY,
            QueryMetricsDatum::new(metrics)
                .with_partition_key_range_id(range)
                .with_request_charge(charge)
                .with_index_utilization(info),
        )
}

pub fn store_stats(codes: &[(u16, u32)]) -> ClientSideRequestStatisticsDatum {
    ClientSideRequestStatisticsDatum {
        store_response_statistics: codes
            .iter()
            .map(|&(status, sub_status)| StoreResponseStatistics {
                request_start_time: Some(query_start()),
                store_result: Some(StoreResult {
                    status_code: StatusCode(status),
                    sub_status_code: sub_status,
                    activity_id: None,
                }),
                resource_type: "Document".into(),
                operation_type: "Query".into(),
                location_endpoint: Some("https://westus.example".into()),
            })
            .collect(),
    }
}

/// A three-page query over two partition key ranges.
///
/// ```text
/// ExecuteQuery (summary, 120ms)
/// ├── Page 1 -> range "0"
/// ├── Transport (client stats, 200/200)
/// ├── Page 2 -> range "1"
/// └── Page 3 -> range "0"
/// ```
pub fn query_trace() -> TraceNode {
    TraceBuilder::new("ExecuteQuery")
        .component(TraceComponent::Query)
        .duration(Duration::from_millis(120))
        .start_time(query_start())
        .summary(TraceSummary {
            regions_contacted: vec![
                ContactedEndpoint::new("West US", "https://westus.example"),
                ContactedEndpoint::new("East US", "https://eastus.example"),
            ],
            failed_request_count: 2,
        })
        .child(page("Page 1", "0", backend(10, 1.0, 4), 2.5))
        .child(
            TraceBuilder::new("Transport")
                .component(TraceComponent::Transport)
                .datum(CLIENT_STATS_KEY, store_stats(&[(200, 0), (200, 0)])),
        )
        .child(page("Page 2", "1", backend(30, 0.5, 6), 4.0))
        .child(page("Page 3", "0", backend(10, 0.0, 2), 1.5))
        .build()
}

/// Counts how often the metrics walk runs.
#[derive(Clone, Default)]
pub struct CountingCollector {
    calls: Arc<AtomicUsize>,
}

impl CountingCollector {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Attach to `diagnostics`, delegating to the real walk.
    pub fn install(&self, diagnostics: TraceDiagnostics) -> TraceDiagnostics {
        let calls = Arc::clone(&self.calls);
        diagnostics.with_collector(move |root| {
            calls.fetch_add(1, Ordering::SeqCst);
            collect_server_side_metrics(root)
        })
    }
}
