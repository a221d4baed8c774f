//! Shared hash ring handle.
//!
//! Readers load the current [`RingSnapshot`] through `ArcSwap` without taking
//! a lock, and every lookup runs against one consistent snapshot. Writers
//! serialize on a mutex, build the next snapshot beside the published one,
//! then swap it in.

use std::sync::Arc;

use arc_swap::ArcSwap;
use concord_core::{Result, RingConfig};
use parking_lot::Mutex;
use tracing::trace;

use crate::snapshot::RingSnapshot;

/// Concurrent consistent hashing ring.
///
/// Cloning the handle shares the underlying ring.
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Currently published ring state.
    current: Arc<ArcSwap<RingSnapshot>>,
    /// Serializes membership changes.
    writer: Arc<Mutex<()>>,
}

impl HashRing {
    /// Create an empty ring with `replicas` virtual positions per node.
    pub fn new(replicas: usize) -> Result<Self> {
        Ok(Self::from_snapshot(RingSnapshot::new(replicas)?))
    }

    /// Create an empty ring from configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        Ok(Self::from_snapshot(RingSnapshot::from_config(config)?))
    }

    /// Publish an existing snapshot as the initial state.
    pub fn from_snapshot(snapshot: RingSnapshot) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(snapshot)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Add a physical node. Returns `false` if it was already present.
    pub fn add_node(&self, node: &str) -> bool {
        self.update(|ring| ring.with_node(node))
    }

    /// Remove a physical node. Returns `false` if it was not present.
    pub fn remove_node(&self, node: &str) -> bool {
        self.update(|ring| ring.without_node(node))
    }

    /// Node owning `key`, or `None` on an empty ring.
    pub fn get_node(&self, key: &str) -> Option<String> {
        self.current.load().get_node(key).map(str::to_owned)
    }

    /// Up to `count` distinct nodes responsible for `key`, owner first.
    pub fn get_nodes_for(&self, key: &str, count: usize) -> Vec<String> {
        self.current
            .load()
            .get_nodes_for(key, count)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Physical nodes in insertion order.
    pub fn get_nodes(&self) -> Vec<String> {
        self.current.load().get_nodes()
    }

    /// Number of physical nodes.
    pub fn size(&self) -> usize {
        self.current.load().size()
    }

    /// Virtual positions per physical node.
    pub fn replicas(&self) -> usize {
        self.current.load().replicas()
    }

    /// The currently published snapshot.
    ///
    /// Use this to run several lookups against the same ring state.
    pub fn snapshot(&self) -> Arc<RingSnapshot> {
        self.current.load_full()
    }

    fn update<F>(&self, change: F) -> bool
    where
        F: FnOnce(&RingSnapshot) -> Option<RingSnapshot>,
    {
        let _guard = self.writer.lock();
        let current = self.current.load_full();
        let Some(next) = change(&*current) else {
            return false;
        };
        trace!(
            nodes = next.size(),
            vnodes = next.vnode_count(),
            "publishing ring snapshot"
        );
        self.current.store(Arc::new(next));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_clones_share_state() {
        let ring = HashRing::new(4).unwrap();
        let other = ring.clone();
        ring.add_node("a");
        assert_eq!(other.get_nodes(), vec!["a"]);
        assert!(!other.add_node("a"));
    }

    #[test]
    fn held_snapshot_is_not_affected_by_later_changes() {
        let ring = HashRing::new(4).unwrap();
        ring.add_node("a");
        let before = ring.snapshot();
        ring.add_node("b");
        ring.remove_node("a");

        assert_eq!(before.get_nodes(), vec!["a"]);
        assert_eq!(before.get_node("key"), Some("a"));
        assert_eq!(ring.get_nodes(), vec!["b"]);
    }

    #[test]
    fn from_config_validates() {
        assert!(HashRing::from_config(&RingConfig { replicas: 0 }).is_err());
        let ring = HashRing::from_config(&RingConfig::default()).unwrap();
        assert_eq!(ring.replicas(), RingConfig::default().replicas);
    }

    #[test]
    fn noop_changes_do_not_republish() {
        let ring = HashRing::new(4).unwrap();
        ring.add_node("a");
        let published = ring.snapshot();
        assert!(!ring.add_node("a"));
        assert!(!ring.remove_node("b"));
        assert!(Arc::ptr_eq(&published, &ring.snapshot()));
    }
}
