//! Raw snapshot types.
//!
//! These types match the JSON served by the monitoring endpoint: one
//! document per poll describing every service, its routes, and their
//! runtime statistics. They are the wire format only; the engine works
//! on the merged/normalized layers derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete snapshot from one poll of the monitoring endpoint.
///
/// Services are keyed by name (unique, case-sensitive); key order carries
/// no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSnapshot {
    pub name: String,
    pub last_updated: Option<String>,
    pub service_map: BTreeMap<String, RawService>,
}

/// One monitored service and its embedded route map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawService {
    pub name: String,
    pub url: Option<String>,
    pub error: Option<String>,
    pub last_updated: Option<String>,
    /// Display color preassigned upstream, if any.
    pub color: Option<String>,
    pub updating_state: Option<String>,
    pub route_map: BTreeMap<String, RawRoute>,
}

/// One route: either explicit endpoint lists or an XML `schema` document
/// describing the route, plus runtime statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRoute {
    pub context: Option<String>,
    pub name: String,
    pub error: Option<String>,
    pub last_updated: Option<String>,
    /// Lifecycle state, free-form ("Started", "None", ...).
    pub state: Option<String>,
    pub uptime: Option<String>,
    /// XML route description; when present, output endpoints are derived
    /// from it instead of the explicit list.
    pub schema: Option<String>,
    pub endpoint_uri: Option<String>,
    pub endpoints: Option<RawEndpoints>,
    #[serde(flatten)]
    pub stats: RouteStats,
}

/// Explicit endpoint lists for a route, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEndpoints {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Numeric route counters and processing-time aggregates.
///
/// `exchanges_total` stays optional: the upstream serializer omits zero
/// fields, and change detection must treat a missing prior value as
/// "not changed" rather than as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteStats {
    pub exchanges_total: Option<u64>,
    pub exchanges_completed: u64,
    pub exchanges_failed: u64,
    pub exchanges_inflight: u64,
    pub max_processing_time: u64,
    pub min_processing_time: u64,
    pub last_processing_time: u64,
    pub mean_processing_time: u64,
    pub total_processing_time: u64,
    pub failures_handled: u64,
    pub redeliveries: u64,
    pub start_timestamp: Option<String>,
}
