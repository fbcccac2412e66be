//! The durable node/edge model rendered to the user.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::data::NormalizedRoute;

/// Stable node identifier, assigned monotonically by first-seen order.
pub type NodeId = usize;

/// One rendered endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Canonical endpoint string.
    pub label: String,
    /// Owning service's display color.
    pub color: String,
    /// Transient change marker, cleared on the next settle.
    #[serde(skip)]
    pub highlight: bool,
}

/// One rendered edge; at most one exists per ordered `(from, to)` pair.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Name of the service whose route this edge carries.
    pub service: String,
    pub color: String,
    pub dashes: bool,
    pub value: u64,
    /// Exchange total shown on the edge, when non-zero.
    pub label: Option<String>,
    /// Human-readable statistics summary.
    pub title: String,
    /// The most recently associated route (first winner per pair).
    pub route: NormalizedRoute,
}

/// The persistent graph structure, built once and patched on every poll.
///
/// Node ids are never reassigned or removed: an endpoint that disappears
/// from a later snapshot keeps its id and simply stops being patched.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    /// canonical endpoint -> node id
    endpoint_index: HashMap<String, NodeId>,
    nodes: BTreeMap<NodeId, GraphNode>,
    /// Ordered pairs that currently have a rendered edge.
    edge_index: HashSet<(NodeId, NodeId)>,
    edges: BTreeMap<(NodeId, NodeId), GraphEdge>,
}

impl GraphModel {
    /// Look up the node id for a canonical endpoint.
    pub fn node_id(&self, endpoint: &str) -> Option<NodeId> {
        self.endpoint_index.get(endpoint).copied()
    }

    /// Register an endpoint, creating its node on first sight.
    ///
    /// An already-known endpoint keeps its node untouched (color
    /// included); the returned id is stable for the model's lifetime.
    pub(crate) fn register_endpoint(&mut self, endpoint: &str, color: &str) -> NodeId {
        if let Some(id) = self.endpoint_index.get(endpoint) {
            return *id;
        }
        let id = self.endpoint_index.len();
        self.endpoint_index.insert(endpoint.to_string(), id);
        self.nodes.insert(
            id,
            GraphNode {
                id,
                label: endpoint.to_string(),
                color: color.to_string(),
                highlight: false,
            },
        );
        id
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_index.contains(&(from, to))
    }

    pub(crate) fn insert_edge(&mut self, edge: GraphEdge) {
        self.edge_index.insert((edge.from, edge.to));
        self.edges.insert((edge.from, edge.to), edge);
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(&id)
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&GraphEdge> {
        self.edges.get(&(from, to))
    }

    pub(crate) fn edge_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut GraphEdge> {
        self.edges.get_mut(&(from, to))
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Edges in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Clear all transient change markers.
    pub(crate) fn settle(&mut self) {
        for node in self.nodes.values_mut() {
            node.highlight = false;
        }
    }
}
