//! Trace datum kinds
//!
//! A datum is a typed payload attached to a trace node under a string key.
//! The walkers in `qtrace-metrics` look for two kinds:
//!
//! - [`TraceDatum::QueryMetrics`]: backend metrics for one partition call
//! - [`TraceDatum::ClientSideRequestStatistics`]: per-replica store responses
//!
//! Other instrumentation records free-form text or JSON.

use crate::index_utilization::IndexUtilizationInfo;
use crate::metrics::BackendMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conventional key for query metrics datums
pub const QUERY_METRICS_KEY: &str = "Query Metrics";

/// Conventional key for client-side request statistics datums
pub const CLIENT_STATS_KEY: &str = "Client Side Request Stats";

/// HTTP-style status code returned by a store replica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Success
    pub const OK: StatusCode = StatusCode(200);
    /// Resource does not exist
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// Partition moved; retry against refreshed routing information
    pub const GONE: StatusCode = StatusCode(410);
    /// Request rate too large
    pub const TOO_MANY_REQUESTS: StatusCode = StatusCode(429);
    /// Replica temporarily unavailable
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Numeric value of the code
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Check for a 2xx code
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

/// Outcome reported by one store replica
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResult {
    /// Response status code
    pub status_code: StatusCode,
    /// Backend sub-status code (0 when none)
    pub sub_status_code: u32,
    /// Backend activity id for the call, if reported
    pub activity_id: Option<String>,
}

impl StoreResult {
    /// Create a store result with no sub-status
    pub fn new(status_code: StatusCode) -> Self {
        StoreResult {
            status_code,
            sub_status_code: 0,
            activity_id: None,
        }
    }
}

/// Statistics for one store response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResponseStatistics {
    /// When the request was sent
    pub request_start_time: Option<DateTime<Utc>>,
    /// Replica result; absent when the call never completed
    pub store_result: Option<StoreResult>,
    /// Resource type name ("Document", "Collection", ...)
    pub resource_type: String,
    /// Operation type name ("Query", "Read", ...)
    pub operation_type: String,
    /// Regional endpoint that served the request
    pub location_endpoint: Option<String>,
}

impl StoreResponseStatistics {
    /// Status code of the completed call, if any
    pub fn status_code(&self) -> Option<StatusCode> {
        self.store_result.as_ref().map(|r| r.status_code)
    }
}

/// Per-request statistics gathered by the client transport
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientSideRequestStatisticsDatum {
    /// Store responses in the order they were received
    pub store_response_statistics: Vec<StoreResponseStatistics>,
}

/// Backend metrics for one partition call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryMetricsDatum {
    /// Backend execution metrics; absent if the transport did not populate it
    pub backend_metrics: Option<BackendMetrics>,
    /// Index usage report, if requested
    pub index_utilization: Option<IndexUtilizationInfo>,
    /// Partition key range the call targeted
    pub partition_key_range_id: Option<String>,
    /// Feed range the call targeted
    pub feed_range: Option<String>,
    /// Request units charged for the call
    pub request_charge: f64,
}

impl QueryMetricsDatum {
    /// Create a datum carrying backend metrics only
    pub fn new(backend_metrics: BackendMetrics) -> Self {
        QueryMetricsDatum {
            backend_metrics: Some(backend_metrics),
            ..Default::default()
        }
    }

    /// Set the partition key range id
    pub fn with_partition_key_range_id(mut self, id: impl Into<String>) -> Self {
        self.partition_key_range_id = Some(id.into());
        self
    }

    /// Set the feed range
    pub fn with_feed_range(mut self, range: impl Into<String>) -> Self {
        self.feed_range = Some(range.into());
        self
    }

    /// Set the request charge
    pub fn with_request_charge(mut self, charge: f64) -> Self {
        self.request_charge = charge;
        self
    }

    /// Set the index utilization report
    pub fn with_index_utilization(mut self, info: IndexUtilizationInfo) -> Self {
        self.index_utilization = Some(info);
        self
    }
}

/// A typed payload attached to a trace node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TraceDatum {
    /// Backend query metrics
    QueryMetrics(QueryMetricsDatum),
    /// Client-side store response statistics
    ClientSideRequestStatistics(ClientSideRequestStatisticsDatum),
    /// Free-form text
    Text(String),
    /// Free-form structured payload
    Json(serde_json::Value),
}

impl TraceDatum {
    /// Stable name of the datum kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            TraceDatum::QueryMetrics(_) => "QueryMetrics",
            TraceDatum::ClientSideRequestStatistics(_) => "ClientSideRequestStatistics",
            TraceDatum::Text(_) => "Text",
            TraceDatum::Json(_) => "Json",
        }
    }

    /// Borrow the query metrics payload, if this is one
    pub fn as_query_metrics(&self) -> Option<&QueryMetricsDatum> {
        match self {
            TraceDatum::QueryMetrics(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the client statistics payload, if this is one
    pub fn as_client_statistics(&self) -> Option<&ClientSideRequestStatisticsDatum> {
        match self {
            TraceDatum::ClientSideRequestStatistics(s) => Some(s),
            _ => None,
        }
    }
}

impl From<QueryMetricsDatum> for TraceDatum {
    fn from(datum: QueryMetricsDatum) -> Self {
        TraceDatum::QueryMetrics(datum)
    }
}

impl From<ClientSideRequestStatisticsDatum> for TraceDatum {
    fn from(datum: ClientSideRequestStatisticsDatum) -> Self {
        TraceDatum::ClientSideRequestStatistics(datum)
    }
}
