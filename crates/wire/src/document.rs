//! Serializable view of a trace tree
//!
//! [`TraceDocument`] borrows a [`TraceNode`] and serializes it, and every
//! node below it, through any serde serializer. The JSON and MessagePack
//! writers both encode this one document, so the two formats always share
//! a shape.
//!
//! Every node becomes a map with a fixed key order:
//!
//! ```text
//! {"name","id","component","level","start_datetime","duration_in_milliseconds",
//!  "summary"?, "data", "children"}
//! ```
//!
//! `summary` is written only on nodes that carry one. Datum keys are written
//! in sorted order, children in recording order.
//!
//! Scalars the formats cannot carry directly use wrappers:
//!
//! - floats go through [`F64`]: `{"$f64": "NaN|+Inf|-Inf|-0.0"}` for special values
//! - durations are fractional milliseconds
//! - timestamps are RFC 3339 with millisecond precision in UTC

use chrono::{DateTime, SecondsFormat, Utc};
use qtrace_core::{
    BackendMetrics, ClientSideRequestStatisticsDatum, IndexUtilizationInfo, QueryMetricsDatum,
    StoreResponseStatistics, StoreResult, TraceDatum, TraceNode,
};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Float that survives formats without NaN or infinities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F64(pub f64);

impl F64 {
    fn special(&self) -> Option<&'static str> {
        let f = self.0;
        if f.is_nan() {
            Some("NaN")
        } else if f == f64::INFINITY {
            Some("+Inf")
        } else if f == f64::NEG_INFINITY {
            Some("-Inf")
        } else if f.to_bits() == (-0.0_f64).to_bits() {
            Some("-0.0")
        } else {
            None
        }
    }
}

impl Serialize for F64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.special() {
            Some(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$f64", name)?;
                map.end()
            }
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Duration as fractional milliseconds
pub fn duration_millis(d: Duration) -> f64 {
    d.as_secs() as f64 * 1000.0 + f64::from(d.subsec_nanos()) / 1_000_000.0
}

fn serialize_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration_millis(*d))
}

fn serialize_timestamp<S: Serializer>(
    dt: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

/// Borrowed serializable view of a node and its subtree
#[derive(Debug, Clone, Copy)]
pub struct TraceDocument<'a>(pub &'a TraceNode);

impl Serialize for TraceDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let summary = node.summary();
        let len = if summary.is_some() { 9 } else { 8 };

        let mut state = serializer.serialize_struct("TraceNode", len)?;
        state.serialize_field("name", node.name())?;
        state.serialize_field("id", &node.id().to_string())?;
        state.serialize_field("component", node.component().as_str())?;
        state.serialize_field("level", node.level().as_str())?;
        state.serialize_field("start_datetime", &Timestamp(node.start_time()))?;
        state.serialize_field("duration_in_milliseconds", &duration_millis(node.duration()))?;
        if let Some(summary) = summary {
            state.serialize_field("summary", summary)?;
        }
        state.serialize_field("data", &DataDocument(node))?;
        state.serialize_field("children", &ChildrenDocument(node))?;
        state.end()
    }
}

struct Timestamp(Option<DateTime<Utc>>);

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_timestamp(&self.0, serializer)
    }
}

struct DataDocument<'a>(&'a TraceNode);

impl Serialize for DataDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = self.0.data();
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (key, datum) in data {
            map.serialize_entry(key, &DatumDocument(datum))?;
        }
        map.end()
    }
}

struct ChildrenDocument<'a>(&'a TraceNode);

impl Serialize for ChildrenDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.0.children();
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&TraceDocument(&child))?;
        }
        seq.end()
    }
}

struct DatumDocument<'a>(&'a TraceDatum);

impl Serialize for DatumDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            TraceDatum::QueryMetrics(m) => QueryMetricsDocument::new(m).serialize(serializer),
            TraceDatum::ClientSideRequestStatistics(s) => {
                ClientStatisticsDocument::new(s).serialize(serializer)
            }
            TraceDatum::Text(text) => serializer.serialize_str(text),
            TraceDatum::Json(value) => value.serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct QueryMetricsDocument<'a> {
    partition_key_range_id: Option<&'a str>,
    feed_range: Option<&'a str>,
    request_charge: F64,
    backend_metrics: Option<BackendMetricsDocument>,
    index_utilization: Option<&'a IndexUtilizationInfo>,
}

impl<'a> QueryMetricsDocument<'a> {
    fn new(datum: &'a QueryMetricsDatum) -> Self {
        QueryMetricsDocument {
            partition_key_range_id: datum.partition_key_range_id.as_deref(),
            feed_range: datum.feed_range.as_deref(),
            request_charge: F64(datum.request_charge),
            backend_metrics: datum.backend_metrics.as_ref().map(BackendMetricsDocument::new),
            index_utilization: datum.index_utilization.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct BackendMetricsDocument {
    retrieved_document_count: u64,
    retrieved_document_size: u64,
    output_document_count: u64,
    output_document_size: u64,
    index_hit_ratio: F64,
    #[serde(serialize_with = "serialize_millis")]
    total_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    query_compilation_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    logical_plan_build_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    physical_plan_build_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    query_optimization_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    index_lookup_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    document_load_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    query_engine_execution_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    system_function_execution_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    user_defined_function_execution_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    document_write_time_ms: Duration,
    #[serde(serialize_with = "serialize_millis")]
    vm_execution_time_ms: Duration,
}

impl BackendMetricsDocument {
    fn new(m: &BackendMetrics) -> Self {
        let prep = &m.query_preparation_times;
        let runtime = &m.runtime_execution_times;
        BackendMetricsDocument {
            retrieved_document_count: m.retrieved_document_count,
            retrieved_document_size: m.retrieved_document_size,
            output_document_count: m.output_document_count,
            output_document_size: m.output_document_size,
            index_hit_ratio: F64(m.index_hit_ratio),
            total_time_ms: m.total_time,
            query_compilation_time_ms: prep.query_compilation_time,
            logical_plan_build_time_ms: prep.logical_plan_build_time,
            physical_plan_build_time_ms: prep.physical_plan_build_time,
            query_optimization_time_ms: prep.query_optimization_time,
            index_lookup_time_ms: m.index_lookup_time,
            document_load_time_ms: m.document_load_time,
            query_engine_execution_time_ms: runtime.query_engine_execution_time,
            system_function_execution_time_ms: runtime.system_function_execution_time,
            user_defined_function_execution_time_ms: runtime.user_defined_function_execution_time,
            document_write_time_ms: m.document_write_time,
            vm_execution_time_ms: m.vm_execution_time,
        }
    }
}

#[derive(Serialize)]
struct ClientStatisticsDocument<'a> {
    store_response_statistics: Vec<StoreResponseDocument<'a>>,
}

impl<'a> ClientStatisticsDocument<'a> {
    fn new(datum: &'a ClientSideRequestStatisticsDatum) -> Self {
        ClientStatisticsDocument {
            store_response_statistics: datum
                .store_response_statistics
                .iter()
                .map(StoreResponseDocument::new)
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct StoreResponseDocument<'a> {
    #[serde(serialize_with = "serialize_timestamp")]
    request_start_time: Option<DateTime<Utc>>,
    resource_type: &'a str,
    operation_type: &'a str,
    location_endpoint: Option<&'a str>,
    store_result: Option<&'a StoreResult>,
}

impl<'a> StoreResponseDocument<'a> {
    fn new(stats: &'a StoreResponseStatistics) -> Self {
        StoreResponseDocument {
            request_start_time: stats.request_start_time,
            resource_type: &stats.resource_type,
            operation_type: &stats.operation_type,
            location_endpoint: stats.location_endpoint.as_deref(),
            store_result: stats.store_result.as_ref(),
        }
    }
}
