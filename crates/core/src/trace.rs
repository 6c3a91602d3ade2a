//! Trace tree types
//!
//! A trace is the hierarchical record of one completed client operation: one
//! node per logical step, children for sub-operations such as per-partition
//! backend calls. The tree is assembled by the request pipeline with a
//! [`TraceBuilder`] and frozen with [`TraceBuilder::build`]; after that every
//! [`TraceNode`] is read-only.
//!
//! ## Ownership
//!
//! A built tree is a single shared arena. A [`TraceNode`] is a handle into
//! it: an `Arc` to the arena plus a node index. Any handle keeps the whole
//! tree alive, and dropping the last one frees every node at once.

use crate::datum::TraceDatum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Unique trace node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random id
    pub fn new() -> Self {
        TraceId(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        TraceId(uuid)
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline component that produced a trace node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraceComponent {
    /// Network transport to a replica
    Transport,
    /// Partition routing and address resolution
    Routing,
    /// Query pipeline
    Query,
    /// Continuation and paging
    Pagination,
    /// JSON parsing
    Json,
    /// Transactional batch
    Batch,
    /// Change feed processing
    ChangeFeed,
    /// Typed (de)serialization
    Poco,
    /// Anything else
    #[default]
    Unknown,
}

impl TraceComponent {
    /// Stable name used in serialized traces
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceComponent::Transport => "Transport",
            TraceComponent::Routing => "Routing",
            TraceComponent::Query => "Query",
            TraceComponent::Pagination => "Pagination",
            TraceComponent::Json => "Json",
            TraceComponent::Batch => "Batch",
            TraceComponent::ChangeFeed => "ChangeFeed",
            TraceComponent::Poco => "Poco",
            TraceComponent::Unknown => "Unknown",
        }
    }
}

/// Verbosity level of a trace node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TraceLevel {
    /// Fine-grained detail
    Verbose,
    /// Normal operation
    #[default]
    Info,
    /// Something unexpected but recoverable
    Warning,
    /// Failure
    Error,
}

impl TraceLevel {
    /// Stable name used in serialized traces
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceLevel::Verbose => "Verbose",
            TraceLevel::Info => "Info",
            TraceLevel::Warning => "Warning",
            TraceLevel::Error => "Error",
        }
    }
}

/// A regional endpoint contacted during the operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactedEndpoint {
    /// Region name
    pub region: String,
    /// Endpoint URI
    pub endpoint: String,
}

impl ContactedEndpoint {
    /// Create a contacted endpoint
    pub fn new(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
        ContactedEndpoint {
            region: region.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Operation-wide summary computed by the request pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Regions contacted, in first-contact order
    pub regions_contacted: Vec<ContactedEndpoint>,
    /// Number of failed replica requests
    pub failed_request_count: u32,
}

struct NodeRecord {
    id: TraceId,
    name: String,
    component: TraceComponent,
    level: TraceLevel,
    parent: Option<usize>,
    children: Vec<usize>,
    data: BTreeMap<String, TraceDatum>,
    duration: Duration,
    start_time: Option<DateTime<Utc>>,
    summary: Option<TraceSummary>,
}

/// Every node of one trace, in pre-order; the root is at index 0
struct TraceArena {
    nodes: Vec<NodeRecord>,
}

/// Handle to an immutable node in a trace tree
///
/// Obtained from [`TraceBuilder::build`]. Every handle shares ownership of
/// the whole tree, so any node can reach its ancestors through
/// [`TraceNode::parent`] and [`TraceNode::root`] for as long as the handle
/// lives. Cloning a handle is a reference count bump.
#[derive(Clone)]
pub struct TraceNode {
    arena: Arc<TraceArena>,
    index: usize,
}

impl TraceNode {
    fn record(&self) -> &NodeRecord {
        &self.arena.nodes[self.index]
    }

    fn at(&self, index: usize) -> TraceNode {
        TraceNode {
            arena: Arc::clone(&self.arena),
            index,
        }
    }

    /// Node id
    pub fn id(&self) -> TraceId {
        self.record().id
    }

    /// Operation name
    pub fn name(&self) -> &str {
        &self.record().name
    }

    /// Producing component
    pub fn component(&self) -> TraceComponent {
        self.record().component
    }

    /// Verbosity level
    pub fn level(&self) -> TraceLevel {
        self.record().level
    }

    /// Parent node, or `None` for the root
    pub fn parent(&self) -> Option<TraceNode> {
        self.record().parent.map(|index| self.at(index))
    }

    /// Check whether this node is the root of its tree
    pub fn is_root(&self) -> bool {
        self.record().parent.is_none()
    }

    /// Children in recording order
    pub fn children(&self) -> Children<'_> {
        Children {
            arena: &self.arena,
            indices: self.record().children.iter(),
        }
    }

    /// The `n`th child, if any
    pub fn child(&self, n: usize) -> Option<TraceNode> {
        self.record().children.get(n).map(|&index| self.at(index))
    }

    /// Datums keyed by name
    pub fn data(&self) -> &BTreeMap<String, TraceDatum> {
        &self.record().data
    }

    /// Wall-clock duration of the operation
    pub fn duration(&self) -> Duration {
        self.record().duration
    }

    /// Start time, if recorded
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.record().start_time
    }

    /// Operation summary, if computed
    pub fn summary(&self) -> Option<&TraceSummary> {
        self.record().summary.as_ref()
    }

    /// Follow parent references up to the root
    pub fn root(&self) -> TraceNode {
        let mut index = self.index;
        while let Some(parent) = self.arena.nodes[index].parent {
            index = parent;
        }
        self.at(index)
    }

    /// Count nodes in the subtree rooted here (inclusive)
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.index];
        while let Some(index) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&self.arena.nodes[index].children);
        }
        count
    }

    /// Number of live handles into this node's tree
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.arena)
    }
}

impl PartialEq for TraceNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena) && self.index == other.index
    }
}

impl Eq for TraceNode {}

impl fmt::Debug for TraceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        f.debug_struct("TraceNode")
            .field("id", &record.id)
            .field("name", &record.name)
            .field("component", &record.component)
            .field("level", &record.level)
            .field("duration", &record.duration)
            .field("data", &record.data.keys().collect::<Vec<_>>())
            .field("children", &record.children.len())
            .finish()
    }
}

/// Iterator over a node's children, see [`TraceNode::children`]
pub struct Children<'a> {
    arena: &'a Arc<TraceArena>,
    indices: std::slice::Iter<'a, usize>,
}

impl Iterator for Children<'_> {
    type Item = TraceNode;

    fn next(&mut self) -> Option<TraceNode> {
        self.indices.next().map(|&index| TraceNode {
            arena: Arc::clone(self.arena),
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<TraceNode> {
        self.indices.next_back().map(|&index| TraceNode {
            arena: Arc::clone(self.arena),
            index,
        })
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Mutable, owned builder for a trace tree
///
/// ```
/// use qtrace_core::{TraceBuilder, TraceDatum};
/// use std::time::Duration;
///
/// let root = TraceBuilder::new("ExecuteQuery")
///     .duration(Duration::from_millis(12))
///     .child(TraceBuilder::new("Partition 0").datum("note", TraceDatum::Text("hi".into())))
///     .build();
///
/// assert!(root.is_root());
/// assert_eq!(root.children().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    id: TraceId,
    name: String,
    component: TraceComponent,
    level: TraceLevel,
    children: Vec<TraceBuilder>,
    data: BTreeMap<String, TraceDatum>,
    duration: Duration,
    start_time: Option<DateTime<Utc>>,
    summary: Option<TraceSummary>,
}

impl TraceBuilder {
    /// Start a node with the given operation name
    pub fn new(name: impl Into<String>) -> Self {
        TraceBuilder {
            id: TraceId::new(),
            name: name.into(),
            component: TraceComponent::default(),
            level: TraceLevel::default(),
            children: Vec::new(),
            data: BTreeMap::new(),
            duration: Duration::ZERO,
            start_time: None,
            summary: None,
        }
    }

    /// Id this node will carry once built
    pub fn id(&self) -> TraceId {
        self.id
    }

    /// Override the generated id
    pub fn with_id(mut self, id: TraceId) -> Self {
        self.id = id;
        self
    }

    /// Set the producing component
    pub fn component(mut self, component: TraceComponent) -> Self {
        self.component = component;
        self
    }

    /// Set the verbosity level
    pub fn level(mut self, level: TraceLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the start time
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the operation summary
    pub fn summary(mut self, summary: TraceSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Attach a datum, replacing any previous datum under the same key
    pub fn datum(mut self, key: impl Into<String>, datum: impl Into<TraceDatum>) -> Self {
        self.data.insert(key.into(), datum.into());
        self
    }

    /// Append a child
    pub fn child(mut self, child: TraceBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order
    pub fn children(mut self, children: impl IntoIterator<Item = TraceBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a child in place
    pub fn push_child(&mut self, child: TraceBuilder) {
        self.children.push(child);
    }

    /// Freeze the tree and return its root
    pub fn build(self) -> TraceNode {
        let mut nodes: Vec<NodeRecord> = Vec::new();
        let mut pending: Vec<(TraceBuilder, Option<usize>)> = vec![(self, None)];

        // Pre-order: a node's children are popped in recording order.
        while let Some((builder, parent)) = pending.pop() {
            let TraceBuilder {
                id,
                name,
                component,
                level,
                children,
                data,
                duration,
                start_time,
                summary,
            } = builder;

            let index = nodes.len();
            nodes.push(NodeRecord {
                id,
                name,
                component,
                level,
                parent,
                children: Vec::with_capacity(children.len()),
                data,
                duration,
                start_time,
                summary,
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }
            pending.extend(children.into_iter().rev().map(|child| (child, Some(index))));
        }

        TraceNode {
            arena: Arc::new(TraceArena { nodes }),
            index: 0,
        }
    }
}
