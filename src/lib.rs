// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # routegraph
//!
//! A snapshot-normalization and graph-synchronization engine with a
//! terminal UI for watching integration route topologies.
//!
//! The engine polls JSON snapshots describing services and their routes,
//! folds each poll into the previous state, canonicalizes endpoint URIs,
//! and maintains an incremental node/edge graph of who talks to whom.
//! Nodes keep their identity across polls, edges are restyled in place,
//! and statistic movement is surfaced as per-edge change signals.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│  graph  │───▶│   ui    │  │
//! │  │ (state) │    │(merge/   │    │(sync)   │    │(render) │  │
//! │  └────┬────┘    │normalize)│    └─────────┘    └─────────┘  │
//! │       │         └──────────┘                                 │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── FileSource | HttpSource | ChannelSource     │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and the
//!   poll/merge/normalize/patch pipeline
//! - **[`source`]**: Snapshot source abstraction ([`SnapshotSource`] trait)
//!   with file polling, HTTP polling, and channel-based input
//! - **[`data`]**: Endpoint canonicalization, XML schema decoding, snapshot
//!   merging and normalization, throughput history
//! - **[`graph`]**: The persistent topology model and the incremental
//!   synchronizer that patches it per snapshot
//! - **[`ui`]**: Terminal rendering using ratatui - topology, endpoint,
//!   and service views with theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a snapshot file
//! routegraph --file snapshot.json
//!
//! # Poll a monitoring server
//! routegraph --url http://monitor:8080 --env staging
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use routegraph::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("snapshot.json"));
//! let app = App::new(source);
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use routegraph::{App, ChannelSource};
//!
//! let (tx, source) = ChannelSource::create("bus://local");
//! let app = App::new(Box::new(source));
//! ```
//!
//! ### As a library with an HTTP polling source
//!
//! ```no_run
//! use std::time::Duration;
//! use routegraph::{App, HttpSource};
//!
//! # tokio_test::block_on(async {
//! // Polls {url}/data in the background; must run inside a runtime
//! let source = HttpSource::spawn("http://monitor:8080", "staging", Duration::from_secs(3));
//! let app = App::new(Box::new(source));
//! # });
//! ```
//!
//! ### Headless graph maintenance
//!
//! ```
//! use routegraph::data::{merge_snapshots, SnapshotNormalizer};
//! use routegraph::graph::GraphSync;
//! use routegraph::source::RawSnapshot;
//!
//! let raw = RawSnapshot::default();
//! let merged = merge_snapshots(None, raw);
//! let mut normalizer = SnapshotNormalizer::default();
//! let normalized = normalizer.normalize(&merged);
//!
//! let mut sync = GraphSync::new();
//! let changed = sync.apply(&normalized);
//! assert!(changed.is_empty());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod graph;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    merge_snapshots, normalize_endpoint, History, MergedSnapshot, NormalizedRoute,
    NormalizedService, NormalizedSnapshot, RouteHealth, SnapshotNormalizer,
};
pub use graph::{GraphEdge, GraphModel, GraphNode, GraphSync, NodeId};
pub use source::{ChannelSource, FileSource, HttpSource, RawSnapshot, SnapshotSource};
