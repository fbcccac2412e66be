//! Channel-based data source.
//!
//! Receives route snapshots via a tokio watch channel. Useful when
//! snapshots are pushed by an embedding application rather than polled
//! from a file or HTTP endpoint.

use tokio::sync::watch;

use super::{RawSnapshot, SnapshotSource};

/// A data source that receives route snapshots via a channel.
///
/// The producer sends snapshots through the channel and this source
/// provides them to the application on `poll`.
///
/// # Example
///
/// ```
/// use routegraph::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<RawSnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<RawSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for pushing snapshots to a `ChannelSource`.
    ///
    /// Returns (sender, source) where the sender pushes snapshots and the
    /// source is handed to the application.
    pub fn create(source_description: &str) -> (watch::Sender<RawSnapshot>, Self) {
        let (tx, rx) = watch::channel(RawSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl SnapshotSource for ChannelSource {
    fn poll(&mut self) -> Option<RawSnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        // Transport errors are the producer's concern here
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawService;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll().unwrap();
        assert!(snapshot.service_map.is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let mut fresh = RawSnapshot::default();
        fresh.service_map.insert(
            "orders".to_string(),
            RawService {
                name: "orders".to_string(),
                ..RawService::default()
            },
        );
        tx.send(fresh).unwrap();

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.service_map.len(), 1);
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("embedded");
        assert_eq!(source.description(), "channel: embedded");
    }
}
