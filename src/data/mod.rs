//! Snapshot processing: canonicalization, merging, normalization.
//!
//! This module turns the raw per-poll snapshots into the canonical form
//! the graph synchronizer consumes.
//!
//! ## Data Flow
//!
//! ```text
//! RawSnapshot (one poll, map-shaped)
//!        │
//!        ▼
//! merge::merge_snapshots()        flatten + carry display state
//!        │
//!        ▼
//! SnapshotNormalizer::normalize() decode schemas, canonicalize
//!        │                        endpoints, assign colors
//!        ▼
//! NormalizedSnapshot ──▶ GraphSync::apply()
//!        │
//!        └──▶ History::record()  (for sparklines)
//! ```

pub mod endpoint;
pub mod history;
pub mod merge;
pub mod normalize;
pub mod schema;

pub use endpoint::normalize_endpoint;
pub use history::History;
pub use merge::{merge_snapshots, MergedService, MergedSnapshot};
pub use normalize::{
    random_color, NormalizedRoute, NormalizedService, NormalizedSnapshot, RouteHealth,
    SnapshotNormalizer,
};
pub use schema::{decode_schema, SchemaPaths};
