//! Trace tree walks
//!
//! Two depth-first walks over a [`TraceNode`] tree, both visiting children in
//! recording order:
//!
//! - [`walk_for_query_metrics`]: hands every query-metrics datum to a visitor.
//!   A node that carries a metrics datum is a leaf for this walk; its subtree
//!   is not entered, so a redundant copy recorded by a sub-operation is never
//!   counted twice.
//! - [`find_relocation`]: scans client request statistics on every node for a
//!   relocation status and stops at the first hit anywhere in the tree.
//!
//! Both walks use an explicit stack, so tree depth is bounded by memory
//! rather than by the thread stack.

use qtrace_core::{QueryMetricsDatum, Result, StatusCode, StoreResult, TraceId, TraceNode};
use tracing::debug;

/// Counters reported by [`walk_for_query_metrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkStats {
    /// Nodes popped from the walk stack
    pub nodes_visited: usize,
    /// Query metrics datums handed to the visitor
    pub metrics_found: usize,
}

/// Status that marks a partition as relocated
///
/// Matching a store result requires an equal status code and, when
/// `sub_status` is set, an equal sub-status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationSignal {
    /// Status code to look for
    pub status: StatusCode,
    /// Sub-status code to require; `None` matches any
    pub sub_status: Option<u32>,
}

impl Default for RelocationSignal {
    fn default() -> Self {
        RelocationSignal {
            status: StatusCode::GONE,
            sub_status: None,
        }
    }
}

impl RelocationSignal {
    /// Check a store result against this signal
    pub fn matches(&self, result: &StoreResult) -> bool {
        result.status_code == self.status
            && self
                .sub_status
                .map_or(true, |sub| result.sub_status_code == sub)
    }
}

/// First query metrics datum on a node, in key order
pub fn query_metrics_datum(node: &TraceNode) -> Option<&QueryMetricsDatum> {
    node.data().values().find_map(|datum| datum.as_query_metrics())
}

/// Walk the tree and hand each metrics-bearing node to `visit`
///
/// Nodes are visited in depth-first pre-order. The first error returned by
/// `visit` stops the walk and is propagated.
pub fn walk_for_query_metrics<F>(root: &TraceNode, mut visit: F) -> Result<WalkStats>
where
    F: FnMut(&TraceNode, &QueryMetricsDatum) -> Result<()>,
{
    let mut stats = WalkStats::default();
    let mut stack: Vec<TraceNode> = vec![root.clone()];

    while let Some(node) = stack.pop() {
        stats.nodes_visited += 1;

        if let Some(datum) = query_metrics_datum(&node) {
            visit(&node, datum)?;
            stats.metrics_found += 1;
            continue;
        }

        // Reverse so the first child is popped first.
        stack.extend(node.children().rev());
    }

    debug!(
        root = %root.id(),
        nodes_visited = stats.nodes_visited,
        metrics_found = stats.metrics_found,
        "query metrics walk finished"
    );
    Ok(stats)
}

/// Find the first node whose client statistics contain a relocation status
///
/// Returns the id of that node, or `None` if no store response anywhere in
/// the tree matches `signal`.
pub fn find_relocation(root: &TraceNode, signal: &RelocationSignal) -> Option<TraceId> {
    let mut stack: Vec<TraceNode> = vec![root.clone()];

    while let Some(node) = stack.pop() {
        let hit = node
            .data()
            .values()
            .filter_map(|datum| datum.as_client_statistics())
            .flat_map(|stats| stats.store_response_statistics.iter())
            .filter_map(|response| response.store_result.as_ref())
            .any(|result| signal.matches(result));

        if hit {
            debug!(node = %node.id(), status = %signal.status, "relocation status found");
            return Some(node.id());
        }

        stack.extend(node.children().rev());
    }

    None
}

/// Check whether any store response in the tree reported `410 Gone`
pub fn is_gone_exception_hit(root: &TraceNode) -> bool {
    find_relocation(root, &RelocationSignal::default()).is_some()
}
