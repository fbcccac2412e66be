//! Snapshot normalization.
//!
//! Turns a merged snapshot into the canonical form the graph
//! synchronizer consumes: schema-described routes get their outputs
//! decoded, every endpoint string is canonicalized, unresolved template
//! placeholders are filtered out of outputs, and display colors are
//! assigned (stable per service, regenerated per route on every pass).

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use super::endpoint::normalize_endpoint;
use super::merge::{MergedService, MergedSnapshot};
use crate::source::{RawRoute, RouteStats};

/// Substring marking an unresolved configuration placeholder.
const PLACEHOLDER: &str = "{{";

/// A snapshot whose endpoint strings are canonical and whose services
/// carry display colors.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSnapshot {
    pub name: String,
    pub last_updated: Option<String>,
    pub services: Vec<NormalizedService>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedService {
    pub name: String,
    /// `#RRGGBB`, stable across polls for a given service name.
    pub color: String,
    pub error: Option<String>,
    pub last_updated: Option<String>,
    pub routes: Vec<NormalizedRoute>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRoute {
    pub name: String,
    /// Regenerated on every normalization pass (display churn kept for
    /// parity with the upstream frontend).
    pub color: String,
    pub state: Option<String>,
    pub uptime: Option<String>,
    pub last_updated: Option<String>,
    /// Canonical input endpoints, never placeholder-filtered.
    pub inputs: Vec<String>,
    /// Canonical output endpoints, placeholder entries dropped.
    pub outputs: Vec<String>,
    /// The pre-decode output list, kept for diagnostics.
    pub raw_outputs: Vec<String>,
    pub stats: RouteStats,
}

impl NormalizedRoute {
    /// Lifecycle bucket used for edge styling and table coloring.
    pub fn health(&self) -> RouteHealth {
        match self.state.as_deref() {
            Some("None") => RouteHealth::Idle,
            Some("Started") => RouteHealth::Active,
            _ => RouteHealth::Failed,
        }
    }
}

/// Coarse lifecycle classification of a route's `state` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteHealth {
    /// `Started`
    Active,
    /// `None` (route known but not running)
    Idle,
    /// Any other (or missing) state
    Failed,
}

/// Normalizes merged snapshots, keeping per-service color assignments
/// across passes.
#[derive(Debug, Default)]
pub struct SnapshotNormalizer {
    colors: HashMap<String, String>,
}

impl SnapshotNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a [`NormalizedSnapshot`]; the input is left untouched.
    pub fn normalize(&mut self, merged: &MergedSnapshot) -> NormalizedSnapshot {
        let services = merged.services.iter().map(|s| self.normalize_service(s)).collect();
        NormalizedSnapshot {
            name: merged.name.clone(),
            last_updated: merged.last_updated.clone(),
            services,
        }
    }

    fn normalize_service(&mut self, service: &MergedService) -> NormalizedService {
        let color = service
            .color
            .clone()
            .or_else(|| self.colors.get(&service.name).cloned())
            .unwrap_or_else(random_color);
        self.colors.insert(service.name.clone(), color.clone());

        NormalizedService {
            name: service.name.clone(),
            color,
            error: service.error.clone(),
            last_updated: service.last_updated.clone(),
            routes: service.routes.iter().map(normalize_route).collect(),
        }
    }
}

fn normalize_route(route: &RawRoute) -> NormalizedRoute {
    let (raw_inputs, raw_outputs) = match &route.endpoints {
        Some(e) => (e.inputs.clone(), e.outputs.clone()),
        None => (Vec::new(), Vec::new()),
    };

    // A schema overrides the explicit outputs entirely; a schema that
    // fails to decode leaves the route with no outputs at all.
    let outputs = match &route.schema {
        Some(schema) => super::schema::decode_schema(schema).output_endpoints(),
        None => raw_outputs.clone(),
    };

    let inputs = raw_inputs.iter().map(|e| normalize_endpoint(e)).collect();
    let outputs = outputs
        .iter()
        .map(|e| normalize_endpoint(e))
        .filter(|e| !e.contains(PLACEHOLDER))
        .collect();

    NormalizedRoute {
        name: route.name.clone(),
        color: random_color(),
        state: route.state.clone(),
        uptime: route.uptime.clone(),
        last_updated: route.last_updated.clone(),
        inputs,
        outputs,
        raw_outputs,
        stats: route.stats.clone(),
    }
}

/// A pseudo-random `#RRGGBB` display color.
pub fn random_color() -> String {
    format!("#{:06X}", rand::thread_rng().gen_range(0..0x100_0000u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawEndpoints;

    fn merged_with_route(route: RawRoute) -> MergedSnapshot {
        MergedSnapshot {
            name: "staging".to_string(),
            last_updated: None,
            services: vec![MergedService {
                name: "orders".to_string(),
                routes: vec![route],
                ..MergedService::default()
            }],
        }
    }

    fn route_with_endpoints(inputs: &[&str], outputs: &[&str]) -> RawRoute {
        RawRoute {
            name: "r1".to_string(),
            state: Some("Started".to_string()),
            endpoints: Some(RawEndpoints {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                outputs: outputs.iter().map(|s| s.to_string()).collect(),
            }),
            ..RawRoute::default()
        }
    }

    #[test]
    fn test_endpoints_canonicalized() {
        let merged = merged_with_route(route_with_endpoints(
            &["jms://orders"],
            &["activemq:VirtualTopic.broker.orders"],
        ));
        let normalized = SnapshotNormalizer::new().normalize(&merged);

        let route = &normalized.services[0].routes[0];
        assert_eq!(route.inputs, vec!["jms:orders"]);
        assert_eq!(route.outputs, vec!["jms:VirtualTopic.broker.orders"]);
    }

    #[test]
    fn test_placeholder_outputs_dropped_inputs_kept() {
        let merged = merged_with_route(route_with_endpoints(
            &["seda:{{dynamicIn}}"],
            &["seda:{{dynamicName}}", "jms:real"],
        ));
        let normalized = SnapshotNormalizer::new().normalize(&merged);

        let route = &normalized.services[0].routes[0];
        assert_eq!(route.inputs, vec!["seda:{{dynamicIn}}"]);
        assert_eq!(route.outputs, vec!["jms:real"]);
    }

    #[test]
    fn test_url_encoded_placeholder_outputs_dropped() {
        // Encoded braces decode during canonicalization, then hit the
        // same placeholder filter as literal ones
        let merged = merged_with_route(route_with_endpoints(
            &["direct:in"],
            &["seda:%7B%7BdynamicName%7D%7D", "jms:real"],
        ));
        let normalized = SnapshotNormalizer::new().normalize(&merged);

        let route = &normalized.services[0].routes[0];
        assert_eq!(route.outputs, vec!["jms:real"]);
    }

    #[test]
    fn test_schema_overrides_outputs_and_keeps_backup() {
        let mut route = route_with_endpoints(&["direct:in"], &["jms:explicit"]);
        route.schema = Some(
            r#"<route><from uri="direct:in"/><to uri="jms://derived"/></route>"#.to_string(),
        );
        let normalized = SnapshotNormalizer::new().normalize(&merged_with_route(route));

        let route = &normalized.services[0].routes[0];
        assert_eq!(route.outputs, vec!["jms:derived"]);
        assert_eq!(route.raw_outputs, vec!["jms:explicit"]);
    }

    #[test]
    fn test_broken_schema_leaves_route_without_outputs() {
        let mut route = route_with_endpoints(&["direct:in"], &["jms:explicit"]);
        route.schema = Some("<route><broken".to_string());
        let normalized = SnapshotNormalizer::new().normalize(&merged_with_route(route));

        let route = &normalized.services[0].routes[0];
        assert!(route.outputs.is_empty());
        assert_eq!(route.inputs, vec!["direct:in"]);
    }

    #[test]
    fn test_service_color_stable_route_color_not_required_to_be() {
        let mut normalizer = SnapshotNormalizer::new();
        let merged = merged_with_route(route_with_endpoints(&["direct:in"], &[]));

        let first = normalizer.normalize(&merged);
        let second = normalizer.normalize(&merged);

        let color = &first.services[0].color;
        assert_eq!(color, &second.services[0].color);
        assert!(color.starts_with('#') && color.len() == 7);
    }

    #[test]
    fn test_route_health_buckets() {
        let mut route = NormalizedRoute::default();
        route.state = Some("Started".to_string());
        assert_eq!(route.health(), RouteHealth::Active);
        route.state = Some("None".to_string());
        assert_eq!(route.health(), RouteHealth::Idle);
        route.state = Some("Stopped".to_string());
        assert_eq!(route.health(), RouteHealth::Failed);
        route.state = None;
        assert_eq!(route.health(), RouteHealth::Failed);
    }
}
