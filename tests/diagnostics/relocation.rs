use crate::common::*;
use qtrace::prelude::*;

fn with_transport(codes: &[(u16, u32)]) -> TraceNode {
    TraceBuilder::new("ExecuteQuery")
        .child(page("Page 1", "0", backend(1, 1.0, 1), 1.0))
        .child(
            TraceBuilder::new("Pipeline").child(
                TraceBuilder::new("Retry")
                    .child(TraceBuilder::new("Transport").datum(CLIENT_STATS_KEY, store_stats(codes))),
            ),
        )
        .build()
}

#[test]
fn gone_found_deep_in_tree() {
    init_tracing();
    let diagnostics = TraceDiagnostics::new(with_transport(&[(200, 0), (410, 1002)]));
    assert!(diagnostics.is_gone_exception_hit());
}

#[test]
fn no_gone_with_other_statuses() {
    let diagnostics = TraceDiagnostics::new(with_transport(&[(200, 0), (429, 3200), (503, 0)]));
    assert!(!diagnostics.is_gone_exception_hit());
}

#[test]
fn sub_status_filter() {
    let trace = with_transport(&[(410, 1000)]);
    let strict = DiagnosticsOptions::new().relocation_sub_status(1002);
    assert!(!TraceDiagnostics::with_options(trace.clone(), strict).is_gone_exception_hit());

    let loose = DiagnosticsOptions::new();
    assert!(TraceDiagnostics::with_options(trace, loose).is_gone_exception_hit());
}

#[test]
fn custom_relocation_status() {
    let trace = with_transport(&[(503, 0)]);
    let options = DiagnosticsOptions::new().relocation_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(TraceDiagnostics::with_options(trace, options).is_gone_exception_hit());
}

#[test]
fn scan_is_independent_of_metrics_cache() {
    let diagnostics = TraceDiagnostics::new(with_transport(&[(410, 0)]));
    assert!(diagnostics.is_gone_exception_hit());
    let _ = diagnostics.query_metrics().unwrap();
    assert!(diagnostics.is_gone_exception_hit());
}
