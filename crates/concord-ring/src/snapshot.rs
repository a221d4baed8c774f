//! Ring state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use concord_core::{ring_hash, ConfigValidation, Result, RingConfig};
use tracing::{debug, warn};

/// Consistent hashing ring state.
///
/// `sorted_hashes` is always exactly the sorted key set of `ring`. When two
/// virtual keys land on the same hash, the lexicographically smallest node id
/// owns it, so the ring depends only on the node set and the replica count,
/// never on the order of membership changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSnapshot {
    /// Virtual positions per physical node.
    replicas: usize,
    /// Physical nodes in insertion order.
    nodes: Vec<String>,
    /// Virtual position -> owning physical node.
    ring: HashMap<u32, String>,
    /// Ascending key set of `ring`, for binary search.
    sorted_hashes: Vec<u32>,
    /// Virtual keys that landed on an already occupied position.
    collisions: usize,
}

impl RingSnapshot {
    /// Create an empty ring. `replicas` must be at least 1.
    pub fn new(replicas: usize) -> Result<Self> {
        Self::from_config(&RingConfig { replicas })
    }

    /// Create an empty ring from validated configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            replicas: config.replicas,
            nodes: Vec::new(),
            ring: HashMap::new(),
            sorted_hashes: Vec::new(),
            collisions: 0,
        })
    }

    /// Add a physical node. Returns `false` if it was already present.
    pub fn add_node(&mut self, node: &str) -> bool {
        if self.contains(node) {
            return false;
        }
        self.nodes.push(node.to_string());
        self.place(node, true);
        self.resort();
        debug!(
            node,
            replicas = self.replicas,
            vnodes = self.sorted_hashes.len(),
            "added node to ring"
        );
        true
    }

    /// Remove a physical node. Returns `false` if it was not present.
    pub fn remove_node(&mut self, node: &str) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n == node) else {
            return false;
        };
        self.nodes.remove(index);
        self.rebuild();
        debug!(node, vnodes = self.sorted_hashes.len(), "removed node from ring");
        true
    }

    /// Copy of this ring with `node` added, or `None` if already present.
    pub fn with_node(&self, node: &str) -> Option<Self> {
        if self.contains(node) {
            return None;
        }
        let mut next = self.clone();
        next.add_node(node);
        Some(next)
    }

    /// Copy of this ring with `node` removed, or `None` if absent.
    pub fn without_node(&self, node: &str) -> Option<Self> {
        if !self.contains(node) {
            return None;
        }
        let mut next = self.clone();
        next.remove_node(node);
        Some(next)
    }

    /// Node owning `key`, or `None` on an empty ring.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        let index = self.start_index(key)?;
        self.owner_at(index)
    }

    /// Up to `count` distinct physical nodes met walking clockwise from `key`.
    ///
    /// The first element, when present, equals [`get_node`](Self::get_node).
    pub fn get_nodes_for(&self, key: &str, count: usize) -> Vec<&str> {
        let Some(start) = self.start_index(key) else {
            return Vec::new();
        };
        let wanted = count.min(self.nodes.len());
        let mut owners: Vec<&str> = Vec::with_capacity(wanted);
        let len = self.sorted_hashes.len();
        for step in 0..len {
            if owners.len() == wanted {
                break;
            }
            if let Some(owner) = self.owner_at((start + step) % len) {
                if !owners.contains(&owner) {
                    owners.push(owner);
                }
            }
        }
        owners
    }

    /// Physical nodes in insertion order.
    pub fn get_nodes(&self) -> Vec<String> {
        self.nodes.clone()
    }

    /// Number of physical nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node is present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when `node` is a member.
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    /// Virtual positions per physical node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of occupied positions on the ring.
    pub fn vnode_count(&self) -> usize {
        self.sorted_hashes.len()
    }

    /// Virtual keys shadowed by an earlier occupant of the same position.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Occupied positions in ascending order with their owners.
    pub fn positions(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.sorted_hashes
            .iter()
            .filter_map(move |hash| self.ring.get(hash).map(|node| (*hash, node.as_str())))
    }

    /// Index into `sorted_hashes` of the first position `>= hash(key)`.
    fn start_index(&self, key: &str) -> Option<usize> {
        if self.sorted_hashes.is_empty() {
            return None;
        }
        let hash = ring_hash(key.as_bytes());
        let index = self.sorted_hashes.partition_point(|h| *h < hash);
        Some(if index == self.sorted_hashes.len() { 0 } else { index })
    }

    fn owner_at(&self, index: usize) -> Option<&str> {
        self.sorted_hashes
            .get(index)
            .and_then(|hash| self.ring.get(hash))
            .map(String::as_str)
    }

    /// Insert the virtual positions of `node`.
    ///
    /// Collisions are reported at `warn!` only when `announce` is set, so a
    /// rebuild does not repeat warnings for positions that did not change.
    fn place(&mut self, node: &str, announce: bool) {
        for replica in 0..self.replicas {
            let hash = vnode_hash(node, replica);
            match self.ring.entry(hash) {
                Entry::Vacant(slot) => {
                    slot.insert(node.to_string());
                }
                Entry::Occupied(mut slot) => {
                    self.collisions += 1;
                    if announce {
                        warn!(
                            hash,
                            existing = %slot.get(),
                            incoming = node,
                            replica,
                            "virtual node hash collision"
                        );
                    }
                    if node < slot.get().as_str() {
                        slot.insert(node.to_string());
                    }
                }
            }
        }
    }

    fn rebuild(&mut self) {
        self.ring.clear();
        self.collisions = 0;
        let nodes = std::mem::take(&mut self.nodes);
        for node in &nodes {
            self.place(node, false);
        }
        self.nodes = nodes;
        self.resort();
        if self.collisions > 0 {
            debug!(collisions = self.collisions, "rebuilt ring with shadowed positions");
        }
    }

    fn resort(&mut self) {
        self.sorted_hashes = self.ring.keys().copied().collect();
        self.sorted_hashes.sort_unstable();
    }
}

/// Ring position of the `replica`-th virtual node of `node`.
fn vnode_hash(node: &str, replica: usize) -> u32 {
    ring_hash(format!("{node}-{replica}").as_bytes())
}
