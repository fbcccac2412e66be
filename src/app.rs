//! Application state and navigation logic.

use anyhow::Result;

use crate::data::{
    merge_snapshots, History, MergedSnapshot, NormalizedSnapshot, SnapshotNormalizer,
};
use crate::graph::{GraphSync, NodeId};
use crate::source::SnapshotSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Endpoint and route detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Edge list of the route topology, with change highlighting.
    Topology,
    /// All known endpoints with their connectivity.
    Endpoints,
    /// Per-service table with throughput history.
    Services,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Topology => View::Endpoints,
            View::Endpoints => View::Services,
            View::Services => View::Topology,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Topology => View::Services,
            View::Endpoints => View::Topology,
            View::Services => View::Endpoints,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Topology => "Topology",
            View::Endpoints => "Endpoints",
            View::Services => "Services",
        }
    }
}

/// What the detail overlay is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A single endpoint node, keyed by its normalized URI.
    Endpoint(String),
    /// A route edge, keyed by its node pair.
    Route((NodeId, NodeId)),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data pipeline
    source: Box<dyn SnapshotSource>,
    previous: Option<MergedSnapshot>,
    normalizer: SnapshotNormalizer,
    pub graph: GraphSync,
    pub data: Option<NormalizedSnapshot>,
    pub history: History,
    pub connection_error: Option<String>,
    /// Edges whose statistics moved in the latest application.
    pub changed_edges: Vec<(NodeId, NodeId)>,

    // Navigation state
    pub selected_edge_index: usize,
    pub selected_node_index: usize,
    pub selected_service_index: usize,
    pub selection: Option<Selection>,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given snapshot source.
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self {
            running: true,
            current_view: View::Topology,
            show_help: false,
            show_detail_overlay: false,
            source,
            previous: None,
            normalizer: SnapshotNormalizer::default(),
            graph: GraphSync::new(),
            data: None,
            history: History::new(),
            connection_error: None,
            changed_edges: Vec::new(),
            selected_edge_index: 0,
            selected_node_index: 0,
            selected_service_index: 0,
            selection: None,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current snapshot source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the source and, if a fresh snapshot arrived, run it through
    /// the merge/normalize/patch pipeline.
    ///
    /// Returns Ok(true) if new data was processed, Ok(false) if not.
    /// A source error marks the connection lost but keeps the last
    /// rendered state on screen.
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(err) = self.source.error() {
            self.connection_error = Some(err);
            return Ok(false);
        }

        if let Some(raw) = self.source.poll() {
            let merged = merge_snapshots(self.previous.as_ref(), raw);
            let normalized = self.normalizer.normalize(&merged);

            self.changed_edges = self.graph.apply(&normalized);
            self.history.record(&normalized);

            self.previous = Some(merged);
            self.data = Some(normalized);
            self.connection_error = None;

            self.clamp_selection();
            Ok(true)
        } else {
            // A failed read surfaces its error on the same tick
            if let Some(err) = self.source.error() {
                self.connection_error = Some(err);
            }
            Ok(false)
        }
    }

    /// Keep selection indices inside the lists they point into.
    fn clamp_selection(&mut self) {
        if let Some(model) = self.graph.model() {
            if self.selected_edge_index >= model.edge_count() {
                self.selected_edge_index = model.edge_count().saturating_sub(1);
            }
            if self.selected_node_index >= model.node_count() {
                self.selected_node_index = model.node_count().saturating_sub(1);
            }
        }
        if let Some(ref data) = self.data {
            if self.selected_service_index >= data.services.len() {
                self.selected_service_index = data.services.len().saturating_sub(1);
            }
        }
    }

    /// Switch to the next view (cycles Topology → Endpoints → Services).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Topology => {
                let max = self.filtered_edge_count().saturating_sub(1);
                self.selected_edge_index = (self.selected_edge_index + n).min(max);
            }
            View::Endpoints => {
                let max = self.filtered_node_count().saturating_sub(1);
                self.selected_node_index = (self.selected_node_index + n).min(max);
            }
            View::Services => {
                if let Some(ref data) = self.data {
                    let max = data.services.len().saturating_sub(1);
                    self.selected_service_index = (self.selected_service_index + n).min(max);
                }
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Topology => {
                self.selected_edge_index = self.selected_edge_index.saturating_sub(n);
            }
            View::Endpoints => {
                self.selected_node_index = self.selected_node_index.saturating_sub(n);
            }
            View::Services => {
                self.selected_service_index = self.selected_service_index.saturating_sub(n);
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Topology => self.selected_edge_index = 0,
            View::Endpoints => self.selected_node_index = 0,
            View::Services => self.selected_service_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Topology => {
                self.selected_edge_index = self.filtered_edge_count().saturating_sub(1);
            }
            View::Endpoints => {
                self.selected_node_index = self.filtered_node_count().saturating_sub(1);
            }
            View::Services => {
                if let Some(ref data) = self.data {
                    self.selected_service_index = data.services.len().saturating_sub(1);
                }
            }
        }
    }

    /// Edges visible under the current filter, in `(from, to)` order.
    pub fn filtered_edges(&self) -> Vec<&crate::graph::GraphEdge> {
        let Some(model) = self.graph.model() else {
            return Vec::new();
        };
        model
            .edges()
            .filter(|edge| {
                self.matches_filter(&edge.service)
                    || self.matches_filter(&edge.route.name)
                    || self
                        .endpoint_label(edge.from)
                        .is_some_and(|l| self.matches_filter(l))
                    || self
                        .endpoint_label(edge.to)
                        .is_some_and(|l| self.matches_filter(l))
            })
            .collect()
    }

    /// Nodes visible under the current filter, in id order.
    pub fn filtered_nodes(&self) -> Vec<&crate::graph::GraphNode> {
        let Some(model) = self.graph.model() else {
            return Vec::new();
        };
        model.nodes().filter(|node| self.matches_filter(&node.label)).collect()
    }

    fn filtered_edge_count(&self) -> usize {
        self.filtered_edges().len()
    }

    fn filtered_node_count(&self) -> usize {
        self.filtered_nodes().len()
    }

    fn endpoint_label(&self, id: NodeId) -> Option<&str> {
        self.graph.model()?.node(id).map(|n| n.label.as_str())
    }

    /// Open the detail overlay for the currently selected item.
    pub fn enter_detail(&mut self) {
        let selection = match self.current_view {
            View::Topology => self
                .filtered_edges()
                .get(self.selected_edge_index)
                .map(|edge| Selection::Route((edge.from, edge.to))),
            View::Endpoints => self
                .filtered_nodes()
                .get(self.selected_node_index)
                .map(|node| Selection::Endpoint(node.label.clone())),
            View::Services => None,
        };
        if selection.is_some() {
            self.selection = selection;
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close any overlay, otherwise return to Topology.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            self.selection = None;
            return;
        }
        if self.current_view != View::Topology {
            self.current_view = View::Topology;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
        self.selection = None;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current snapshot and graph to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> anyhow::Result<()> {
        use std::io::Write;

        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        let Some(model) = self.graph.model() else {
            anyhow::bail!("No graph to export");
        };

        let nodes: Vec<serde_json::Value> = model
            .nodes()
            .map(|n| {
                serde_json::json!({
                    "id": n.id,
                    "label": n.label,
                    "color": n.color,
                })
            })
            .collect();
        let edges: Vec<serde_json::Value> = model
            .edges()
            .map(|e| serde_json::to_value(e))
            .collect::<Result<_, _>>()?;

        let export = serde_json::json!({
            "snapshot": data,
            "nodes": nodes,
            "edges": edges,
        });

        let json = serde_json::to_string_pretty(&export)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, RawRoute, RawService, RawSnapshot};
    use std::collections::BTreeMap;

    fn sample_snapshot(total: u64) -> RawSnapshot {
        let route = RawRoute {
            name: "orders-in".to_string(),
            state: Some("Started".to_string()),
            endpoints: Some(crate::source::RawEndpoints {
                inputs: vec!["direct://in".to_string()],
                outputs: vec!["jms://orders".to_string()],
            }),
            stats: crate::source::RouteStats {
                exchanges_total: Some(total),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut route_map = BTreeMap::new();
        route_map.insert("orders-in".to_string(), route);
        let service = RawService {
            name: "orders".to_string(),
            route_map,
            ..Default::default()
        };
        let mut service_map = BTreeMap::new();
        service_map.insert("orders".to_string(), service);
        RawSnapshot {
            name: "staging".to_string(),
            service_map,
            ..Default::default()
        }
    }

    #[test]
    fn test_reload_runs_full_pipeline() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(1)).unwrap();
        let mut app = App::new(Box::new(source));

        assert!(app.reload_data().unwrap());
        assert!(app.data.is_some());
        let model = app.graph.model().unwrap();
        assert_eq!(model.node_id("direct:in"), Some(0));
        assert_eq!(model.node_id("jms:orders"), Some(1));
        assert!(app.changed_edges.is_empty());

        tx.send(sample_snapshot(2)).unwrap();
        assert!(app.reload_data().unwrap());
        assert_eq!(app.changed_edges, vec![(0, 1)]);
    }

    #[test]
    fn test_reload_without_new_data_is_a_noop() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(1)).unwrap();
        let mut app = App::new(Box::new(source));

        assert!(app.reload_data().unwrap());
        assert!(!app.reload_data().unwrap());
        // Earlier change signals are kept until the next application
        assert!(app.changed_edges.is_empty());
    }

    #[test]
    fn test_encoded_placeholder_endpoint_never_becomes_a_node() {
        let mut snapshot = sample_snapshot(1);
        let service = snapshot.service_map.get_mut("orders").unwrap();
        let route = service.route_map.get_mut("orders-in").unwrap();
        route.endpoints.as_mut().unwrap().outputs =
            vec!["seda:%7B%7BdynamicName%7D%7D".to_string(), "jms://orders".to_string()];

        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot).unwrap();
        let mut app = App::new(Box::new(source));
        app.reload_data().unwrap();

        let model = app.graph.model().unwrap();
        assert!(model.node_id("seda:{{dynamicName}}").is_none());
        assert!(model.node_id("seda:%7B%7BdynamicName%7D%7D").is_none());
        assert!(model.node_id("jms:orders").is_some());
    }

    #[test]
    fn test_view_cycles() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(1)).unwrap();
        let mut app = App::new(Box::new(source));

        assert_eq!(app.current_view, View::Topology);
        app.next_view();
        assert_eq!(app.current_view, View::Endpoints);
        app.next_view();
        assert_eq!(app.current_view, View::Services);
        app.next_view();
        assert_eq!(app.current_view, View::Topology);
        app.prev_view();
        assert_eq!(app.current_view, View::Services);
    }

    #[test]
    fn test_enter_detail_selects_edge_then_back_closes() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(1)).unwrap();
        let mut app = App::new(Box::new(source));
        app.reload_data().unwrap();

        app.enter_detail();
        assert!(app.show_detail_overlay);
        assert_eq!(app.selection, Some(Selection::Route((0, 1))));

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert!(app.selection.is_none());
    }

    #[test]
    fn test_filter_narrows_endpoint_list() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(1)).unwrap();
        let mut app = App::new(Box::new(source));
        app.reload_data().unwrap();

        assert_eq!(app.filtered_nodes().len(), 2);
        app.start_filter();
        for c in "jms".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.filtered_nodes().len(), 1);
        app.clear_filter();
        assert_eq!(app.filtered_nodes().len(), 2);
    }

    #[test]
    fn test_export_writes_nodes_and_edges() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(sample_snapshot(5)).unwrap();
        let mut app = App::new(Box::new(source));
        app.reload_data().unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"].as_array().unwrap().len(), 1);
        assert_eq!(value["snapshot"]["name"], "staging");
    }
}
