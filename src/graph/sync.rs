//! Incremental graph synchronization.
//!
//! The synchronizer owns the [`GraphModel`]: it builds it from the first
//! normalized snapshot and patches it in place on every later one,
//! deciding per edge whether to add, update, or leave untouched. Nodes
//! and edges are never removed; an endpoint absent from a snapshot
//! simply stops being patched.

use crate::data::{NormalizedRoute, NormalizedService, NormalizedSnapshot, RouteHealth};

use super::model::{GraphEdge, GraphModel, NodeId};

const IDLE_COLOR: &str = "#b2b2b2";
const FAILED_COLOR: &str = "#ff251e";

/// Builds and incrementally patches the route topology graph.
#[derive(Debug, Default)]
pub struct GraphSync {
    model: Option<GraphModel>,
}

impl GraphSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current model, if a snapshot has been applied.
    pub fn model(&self) -> Option<&GraphModel> {
        self.model.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.model.is_some()
    }

    /// Apply a normalized snapshot: build the model on the first call,
    /// patch it on every later one.
    ///
    /// Returns the `(from, to)` pairs whose statistics moved; the build
    /// pass returns none. Highlights raised by the previous application
    /// are settled before patching, so re-applying an identical snapshot
    /// yields no change signals and no lingering highlights.
    pub fn apply(&mut self, snapshot: &NormalizedSnapshot) -> Vec<(NodeId, NodeId)> {
        match &mut self.model {
            None => {
                self.model = Some(build(snapshot));
                Vec::new()
            }
            Some(model) => {
                model.settle();
                update(model, snapshot)
            }
        }
    }

    /// Clear transient change markers without applying a snapshot.
    pub fn settle(&mut self) {
        if let Some(model) = &mut self.model {
            model.settle();
        }
    }
}

/// First-snapshot construction: register every endpoint as a node, then
/// create one edge per `(input, output)` pair that is not taken yet.
fn build(snapshot: &NormalizedSnapshot) -> GraphModel {
    let mut model = GraphModel::default();

    for service in &snapshot.services {
        for route in &service.routes {
            for input in &route.inputs {
                model.register_endpoint(input, &service.color);
            }
            for output in &route.outputs {
                model.register_endpoint(output, &service.color);
            }
        }
    }

    for service in &snapshot.services {
        for route in &service.routes {
            add_missing_edges(&mut model, service, route);
        }
    }

    model
}

/// Incremental patch: discover new endpoints eagerly, then add or
/// update edges per `(input, output)` pair.
fn update(model: &mut GraphModel, snapshot: &NormalizedSnapshot) -> Vec<(NodeId, NodeId)> {
    for service in &snapshot.services {
        for route in &service.routes {
            for endpoint in route.inputs.iter().chain(route.outputs.iter()) {
                if model.node_id(endpoint).is_none() {
                    model.register_endpoint(endpoint, &service.color);
                }
            }
        }
    }

    let mut changed = Vec::new();
    for service in &snapshot.services {
        for route in &service.routes {
            for input in &route.inputs {
                for output in &route.outputs {
                    let (Some(from), Some(to)) = (model.node_id(input), model.node_id(output))
                    else {
                        continue;
                    };

                    if !model.has_edge(from, to) {
                        model.insert_edge(make_edge(route, service, from, to));
                        continue;
                    }

                    let moved = model
                        .edge(from, to)
                        .is_some_and(|edge| stats_changed(&edge.route, route));
                    if moved {
                        if let Some(edge) = model.edge_mut(from, to) {
                            *edge = make_edge(route, service, from, to);
                        }
                        if let Some(node) = model.node_mut(to) {
                            node.highlight = true;
                        }
                        changed.push((from, to));
                    }
                }
            }
        }
    }
    changed
}

fn add_missing_edges(model: &mut GraphModel, service: &NormalizedService, route: &NormalizedRoute) {
    for input in &route.inputs {
        for output in &route.outputs {
            let (Some(from), Some(to)) = (model.node_id(input), model.node_id(output)) else {
                continue;
            };
            // First route between a pair wins; later colliders are
            // dropped from rendering.
            if !model.has_edge(from, to) {
                model.insert_edge(make_edge(route, service, from, to));
            }
        }
    }
}

/// An edge is stale when the route's headline statistics moved.
///
/// A missing exchange total on either side means there is nothing
/// trustworthy to compare, so the pair counts as unchanged.
fn stats_changed(previous: &NormalizedRoute, current: &NormalizedRoute) -> bool {
    let (Some(prev_total), Some(cur_total)) =
        (previous.stats.exchanges_total, current.stats.exchanges_total)
    else {
        return false;
    };
    prev_total != cur_total || previous.state != current.state || previous.uptime != current.uptime
}

fn make_edge(
    route: &NormalizedRoute,
    service: &NormalizedService,
    from: NodeId,
    to: NodeId,
) -> GraphEdge {
    let (color, dashes) = match route.health() {
        RouteHealth::Idle => (IDLE_COLOR.to_string(), true),
        RouteHealth::Failed => (FAILED_COLOR.to_string(), true),
        RouteHealth::Active => (service.color.clone(), false),
    };

    GraphEdge {
        from,
        to,
        service: service.name.clone(),
        color,
        dashes,
        value: 1,
        label: route
            .stats
            .exchanges_total
            .filter(|total| *total > 0)
            .map(|total| total.to_string()),
        title: route_title(route),
        route: route.clone(),
    }
}

/// Human-readable summary of a route's statistics, one field per line.
pub fn route_title(route: &NormalizedRoute) -> String {
    let stats = &route.stats;
    let lines = vec![
        route.name.clone(),
        format!("State: {}", route.state.as_deref().unwrap_or("none")),
        format!("Uptime: {}", route.uptime.as_deref().unwrap_or("-")),
        format!("LastUpdated: {}", route.last_updated.as_deref().unwrap_or("-")),
        "----".to_string(),
        format!("exchangesTotal: {}", stats.exchanges_total.unwrap_or(0)),
        format!("exchangesCompleted: {}", stats.exchanges_completed),
        format!("exchangesFailed: {}", stats.exchanges_failed),
        format!("exchangesInflight: {}", stats.exchanges_inflight),
        format!("maxProcessingTime: {}", stats.max_processing_time),
        format!("minProcessingTime: {}", stats.min_processing_time),
        format!("lastProcessingTime: {}", stats.last_processing_time),
        format!("meanProcessingTime: {}", stats.mean_processing_time),
        format!("totalProcessingTime: {}", stats.total_processing_time),
        format!("failuresHandled: {}", stats.failures_handled),
        format!("redeliveries: {}", stats.redeliveries),
        format!("startTimestamp: {}", stats.start_timestamp.as_deref().unwrap_or("-")),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RouteStats;

    fn route(name: &str, inputs: &[&str], outputs: &[&str], total: Option<u64>) -> NormalizedRoute {
        NormalizedRoute {
            name: name.to_string(),
            color: "#123456".to_string(),
            state: Some("Started".to_string()),
            uptime: Some("1h".to_string()),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            stats: RouteStats {
                exchanges_total: total,
                ..RouteStats::default()
            },
            ..NormalizedRoute::default()
        }
    }

    fn snapshot(routes: Vec<NormalizedRoute>) -> NormalizedSnapshot {
        NormalizedSnapshot {
            name: "staging".to_string(),
            last_updated: None,
            services: vec![NormalizedService {
                name: "orders".to_string(),
                color: "#00FF00".to_string(),
                routes,
                ..NormalizedService::default()
            }],
        }
    }

    #[test]
    fn test_build_assigns_ids_in_first_seen_order() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![
            route("r1", &["a"], &["b"], Some(1)),
            route("r2", &["b"], &["c"], Some(1)),
        ]));

        let model = sync.model().unwrap();
        assert_eq!(model.node_id("a"), Some(0));
        assert_eq!(model.node_id("b"), Some(1));
        assert_eq!(model.node_id("c"), Some(2));
        assert_eq!(model.node_count(), 3);
        assert_eq!(model.edge_count(), 2);
    }

    #[test]
    fn test_identity_deterministic_across_runs() {
        let snapshots = vec![
            snapshot(vec![route("r1", &["a"], &["b"], Some(1))]),
            snapshot(vec![
                route("r1", &["a"], &["b"], Some(2)),
                route("r2", &["c"], &["a"], Some(1)),
            ]),
        ];

        let run = || {
            let mut sync = GraphSync::new();
            for s in &snapshots {
                sync.apply(s);
            }
            let model = sync.model().unwrap();
            (model.node_id("a"), model.node_id("b"), model.node_id("c"))
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_node_id_survives_disappearance() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![
            route("r1", &["a"], &["b"], Some(1)),
            route("r2", &["c"], &["d"], Some(1)),
        ]));
        let id_c = sync.model().unwrap().node_id("c");

        // c/d gone from the next two polls, then c returns
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(2))]));
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(3))]));
        sync.apply(&snapshot(vec![route("r2", &["c"], &["a"], Some(1))]));

        assert_eq!(sync.model().unwrap().node_id("c"), id_c);
    }

    #[test]
    fn test_one_edge_per_pair_first_route_wins() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![
            route("first", &["a"], &["b"], Some(1)),
            route("second", &["a"], &["b"], Some(99)),
        ]));

        let model = sync.model().unwrap();
        assert_eq!(model.edge_count(), 1);
        let edge = model.edge(0, 1).unwrap();
        assert_eq!(edge.route.name, "first");
    }

    #[test]
    fn test_reapplying_same_snapshot_signals_nothing() {
        let mut sync = GraphSync::new();
        let snap = snapshot(vec![route("r1", &["a"], &["b"], Some(10))]);
        sync.apply(&snap);

        let changed = sync.apply(&snap);
        assert!(changed.is_empty());
        assert!(sync.model().unwrap().nodes().all(|n| !n.highlight));
    }

    #[test]
    fn test_moved_total_signals_change_and_highlights_destination() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(10))]));

        let changed = sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(11))]));
        assert_eq!(changed, vec![(0, 1)]);

        let model = sync.model().unwrap();
        assert!(model.node(1).unwrap().highlight);
        assert!(!model.node(0).unwrap().highlight);
        assert_eq!(model.edge(0, 1).unwrap().label.as_deref(), Some("11"));
    }

    #[test]
    fn test_highlight_clears_on_next_application() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(10))]));
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(11))]));

        let changed = sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(11))]));
        assert!(changed.is_empty());
        assert!(!sync.model().unwrap().node(1).unwrap().highlight);
    }

    #[test]
    fn test_missing_total_is_conservatively_unchanged() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], None)]));

        // State moved but there is no prior total to compare against
        let mut moved = route("r1", &["a"], &["b"], None);
        moved.state = Some("Stopped".to_string());
        let changed = sync.apply(&snapshot(vec![moved]));
        assert!(changed.is_empty());
    }

    #[test]
    fn test_state_move_alone_signals_change() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(5))]));

        let mut stopped = route("r1", &["a"], &["b"], Some(5));
        stopped.state = Some("Stopped".to_string());
        let changed = sync.apply(&snapshot(vec![stopped]));
        assert_eq!(changed.len(), 1);

        // Non-Started state renders red dashed
        let edge = sync.model().unwrap().edge(0, 1).unwrap();
        assert_eq!(edge.color, FAILED_COLOR);
        assert!(edge.dashes);
    }

    #[test]
    fn test_new_endpoints_and_edges_added_on_update() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(1))]));

        sync.apply(&snapshot(vec![
            route("r1", &["a"], &["b"], Some(1)),
            route("r2", &["b"], &["c"], Some(1)),
        ]));

        let model = sync.model().unwrap();
        assert_eq!(model.node_id("c"), Some(2));
        assert!(model.has_edge(1, 2));
    }

    #[test]
    fn test_route_without_outputs_is_skipped_not_fatal() {
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &[], Some(1))]));

        let model = sync.model().unwrap();
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_edge_styling_by_state() {
        let mut idle = route("r1", &["a"], &["b"], Some(1));
        idle.state = Some("None".to_string());
        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![idle]));

        let edge = sync.model().unwrap().edge(0, 1).unwrap();
        assert_eq!(edge.color, IDLE_COLOR);
        assert!(edge.dashes);

        let mut sync = GraphSync::new();
        sync.apply(&snapshot(vec![route("r1", &["a"], &["b"], Some(1))]));
        let edge = sync.model().unwrap().edge(0, 1).unwrap();
        // Started routes take the service color, solid
        assert_eq!(edge.color, "#00FF00");
        assert!(!edge.dashes);
    }

    #[test]
    fn test_title_summarizes_statistics() {
        let title = route_title(&route("r1", &["a"], &["b"], Some(42)));
        assert!(title.contains("r1"));
        assert!(title.contains("State: Started"));
        assert!(title.contains("exchangesTotal: 42"));
        assert!(title.contains("redeliveries: 0"));
    }
}
