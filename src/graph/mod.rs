//! Route topology graph.
//!
//! [`GraphModel`] is the persistent node/edge store with stable node
//! identity; [`GraphSync`] drives it from normalized snapshots, building
//! once and patching incrementally afterwards.

pub mod model;
pub mod sync;

pub use model::{GraphEdge, GraphModel, GraphNode, NodeId};
pub use sync::{route_title, GraphSync};
