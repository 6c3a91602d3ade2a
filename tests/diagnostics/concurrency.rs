use crate::common::*;
use qtrace::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_first_calls_agree() {
    init_tracing();
    let collector = CountingCollector::default();
    let diagnostics = Arc::new(collector.install(TraceDiagnostics::new(query_trace())));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let diagnostics = Arc::clone(&diagnostics);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                diagnostics.query_metrics().unwrap().unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Racing walks are allowed, but every caller sees the same value
    assert!(collector.calls() >= 1);
    assert!(collector.calls() <= 8);
    for result in &results {
        assert_eq!(**result, *results[0]);
    }

    // Once settled, the cache serves every call
    let settled = collector.calls();
    let cached = diagnostics.query_metrics().unwrap().unwrap();
    assert_eq!(collector.calls(), settled);
    assert_eq!(*cached, *results[0]);
}

#[test]
fn facade_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TraceDiagnostics>();
    assert_send_sync::<Arc<dyn Diagnostics>>();
}
