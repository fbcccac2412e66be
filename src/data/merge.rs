//! Snapshot merging.
//!
//! Each poll delivers an independent snapshot; the merger combines it
//! with the previously displayed one into the flattened shape the
//! normalizer and graph synchronizer expect. The fresh snapshot always
//! wins for data; the one thing carried across polls is the display
//! color already assigned to a service, so its nodes keep a stable hue.

use std::mem;

use crate::source::{RawRoute, RawSnapshot};

/// A snapshot with map-shaped collections flattened into ordered lists.
///
/// Service and route order follows the source maps' key order, which is
/// a consistent total order across polls.
#[derive(Debug, Clone, Default)]
pub struct MergedSnapshot {
    pub name: String,
    pub last_updated: Option<String>,
    pub services: Vec<MergedService>,
}

#[derive(Debug, Clone, Default)]
pub struct MergedService {
    pub name: String,
    pub url: Option<String>,
    /// Error and staleness signaling always reflects the latest poll.
    pub error: Option<String>,
    pub last_updated: Option<String>,
    pub color: Option<String>,
    pub routes: Vec<RawRoute>,
}

/// Merge the previously displayed snapshot with a freshly fetched one.
///
/// Services present only in the previous snapshot are dropped; services
/// present in the fresh snapshot are adopted wholesale, with `error` and
/// `last_updated` taken from the fresh record. A color assigned on an
/// earlier pass is carried forward unless the fresh record brings its own.
pub fn merge_snapshots(previous: Option<&MergedSnapshot>, fresh: RawSnapshot) -> MergedSnapshot {
    let mut services = Vec::with_capacity(fresh.service_map.len());

    for (service_name, mut raw) in fresh.service_map {
        let prior = previous.and_then(|p| p.services.iter().find(|s| s.name == service_name));

        let color = raw
            .color
            .take()
            .or_else(|| prior.and_then(|p| p.color.clone()));

        let mut routes = Vec::with_capacity(raw.route_map.len());
        for (route_name, mut route) in mem::take(&mut raw.route_map) {
            if route.name.is_empty() {
                route.name = route_name;
            }
            routes.push(route);
        }

        services.push(MergedService {
            name: if raw.name.is_empty() { service_name } else { raw.name },
            url: raw.url,
            error: raw.error,
            last_updated: raw.last_updated,
            color,
            routes,
        });
    }

    MergedSnapshot {
        name: fresh.name,
        last_updated: fresh.last_updated,
        services,
    }
}
