//! Data source abstraction for receiving route snapshots.
//!
//! This module provides a trait-based abstraction for receiving snapshots
//! from various backends: the live monitoring endpoint over HTTP, a JSON
//! file on disk, or an in-process channel for embedding.

mod channel;
mod file;
mod http;
mod raw;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::{HttpSource, SourceError};
pub use raw::{RawEndpoints, RawRoute, RawService, RawSnapshot, RouteStats};

use std::fmt::Debug;

/// Trait for receiving raw snapshots from various sources.
///
/// Implementations provide one complete [`RawSnapshot`] per successful
/// poll. Polling must be non-blocking; sources backed by async transports
/// buffer internally and hand results over here.
///
/// # Example
///
/// ```
/// use routegraph::{FileSource, SnapshotSource};
///
/// let mut source = FileSource::new("snapshot.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} services", snapshot.service_map.len());
/// }
/// ```
pub trait SnapshotSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    fn poll(&mut self) -> Option<RawSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The sticky error from the most recent poll attempt, if any.
    ///
    /// A source whose last poll failed reports the failure here until a
    /// later poll succeeds. Returns an owned string because sources fed
    /// by background tasks keep the error behind shared state.
    fn error(&self) -> Option<String>;
}
