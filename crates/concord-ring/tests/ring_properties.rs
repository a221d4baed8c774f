//! Hash Ring Property Tests
//!
//! Verifies the properties callers rely on:
//!
//! 1. **Determinism**: a fixed ring maps a key to the same node every time
//! 2. **Bounded churn**: a membership change moves about `1/N` of the keys
//! 3. **No orphans**: after removal no key maps to the removed node
//! 4. **Empty ring**: every lookup returns `None`
//! 5. **Order independence**: the ring depends only on the node set

use std::collections::HashMap;

use concord_ring::{HashRing, RingSnapshot};
use proptest::prelude::*;

const SAMPLE: usize = 10_000;

fn sample_keys() -> Vec<String> {
    (0..SAMPLE).map(|i| format!("key-{i}")).collect()
}

fn ring_of(replicas: usize, nodes: &[&str]) -> RingSnapshot {
    let mut ring = RingSnapshot::new(replicas).unwrap();
    for node in nodes {
        ring.add_node(node);
    }
    ring
}

fn owners(ring: &RingSnapshot, keys: &[String]) -> Vec<Option<String>> {
    keys.iter()
        .map(|k| ring.get_node(k).map(str::to_owned))
        .collect()
}

// ============================================================================
// Basic behaviour
// ============================================================================

#[test]
fn three_server_walkthrough() {
    let ring = HashRing::new(3).unwrap();
    ring.add_node("server-1");
    ring.add_node("server-2");
    ring.add_node("server-3");
    assert_eq!(ring.size(), 3);

    for key in ["user:123", "user:456", "user:789"] {
        assert!(ring.get_node(key).is_some(), "{key} should map to a node");
    }

    let first = ring.get_node("consistent-key");
    for _ in 0..10 {
        assert_eq!(ring.get_node("consistent-key"), first);
    }

    ring.remove_node("server-2");
    assert_eq!(ring.size(), 2);
    let owner = ring.get_node("any-key").unwrap();
    assert_ne!(owner, "server-2");

    let empty = HashRing::new(3).unwrap();
    assert_eq!(empty.get_node("some-key"), None);
}

#[test]
fn lookups_are_deterministic() {
    let ring = ring_of(20, &["a", "b", "c", "d"]);
    let twin = ring_of(20, &["a", "b", "c", "d"]);

    for key in sample_keys().iter().take(1_000) {
        let owner = ring.get_node(key);
        for _ in 0..5 {
            assert_eq!(ring.get_node(key), owner);
        }
        assert_eq!(twin.get_node(key), owner, "independent rings disagree on {key}");
    }
}

#[test]
fn empty_ring_maps_nothing() {
    let ring = RingSnapshot::new(10).unwrap();
    assert!(sample_keys().iter().all(|k| ring.get_node(k).is_none()));
}

#[test]
fn removing_every_node_empties_the_ring() {
    let ring = HashRing::new(5).unwrap();
    ring.add_node("a");
    ring.add_node("b");
    ring.remove_node("a");
    ring.remove_node("b");

    assert_eq!(ring.size(), 0);
    assert_eq!(ring.snapshot().vnode_count(), 0);
    assert_eq!(ring.get_node("key"), None);
}

// ============================================================================
// Distribution and churn
// ============================================================================

#[test]
fn keys_spread_across_nodes() {
    let nodes = ["node-0", "node-1", "node-2", "node-3"];
    let ring = ring_of(100, &nodes);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for owner in owners(&ring, &sample_keys()).into_iter().flatten() {
        *counts.entry(owner).or_default() += 1;
    }

    for node in nodes {
        let share = counts.get(node).copied().unwrap_or(0) as f64 / SAMPLE as f64;
        assert!(
            (0.15..=0.35).contains(&share),
            "{node} owns {share:.3} of the keyspace"
        );
    }
}

#[test]
fn adding_node_moves_about_one_nth() {
    let old = ring_of(100, &["node-0", "node-1", "node-2", "node-3"]);
    let new = old.with_node("node-4").unwrap();
    let keys = sample_keys();

    let ratio = RingSnapshot::churn_ratio(&old, &new, keys.iter().map(String::as_str));
    assert!(
        (0.1..=0.3).contains(&ratio),
        "expected about 1/5 of keys to move, moved {ratio:.3}"
    );

    let migrations = RingSnapshot::migrations(&old, &new, keys.iter().map(String::as_str));
    assert!(migrations.iter().all(|m| m.to.as_deref() == Some("node-4")));
}

#[test]
fn removing_node_moves_only_its_keys() {
    let old = ring_of(100, &["node-0", "node-1", "node-2", "node-3", "node-4"]);
    let new = old.without_node("node-2").unwrap();
    let keys = sample_keys();

    let before = owners(&old, &keys);
    let after = owners(&new, &keys);
    for (key, (b, a)) in keys.iter().zip(before.iter().zip(after.iter())) {
        if b.as_deref() != Some("node-2") {
            assert_eq!(b, a, "{key} was not on the removed node but moved");
        }
    }

    let ratio = RingSnapshot::churn_ratio(&old, &new, keys.iter().map(String::as_str));
    assert!((0.1..=0.3).contains(&ratio), "moved {ratio:.3}");
}

#[test]
fn no_key_maps_to_removed_node() {
    let ring = HashRing::new(10).unwrap();
    for node in ["a", "b", "c", "d"] {
        ring.add_node(node);
    }
    ring.remove_node("c");

    let members = ring.get_nodes();
    for key in sample_keys().iter().take(2_000) {
        let owner = ring.get_node(key).unwrap();
        assert_ne!(owner, "c");
        assert!(members.contains(&owner));
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn readers_see_consistent_snapshots_during_membership_changes() {
    let ring = HashRing::new(20).unwrap();
    ring.add_node("stable");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let ring = ring.clone();
            scope.spawn(move || {
                for i in 0..2_000 {
                    let snapshot = ring.snapshot();
                    let owner = snapshot.get_node(&format!("key-{i}")).unwrap();
                    assert!(snapshot.contains(owner), "{owner} not in its own snapshot");
                    assert!(ring.get_node(&format!("key-{i}")).is_some());
                }
            });
        }

        let writer = ring.clone();
        scope.spawn(move || {
            for round in 0..200 {
                let node = format!("node-{}", round % 7);
                if !writer.add_node(&node) {
                    writer.remove_node(&node);
                }
            }
        });
    });

    assert!(ring.get_nodes().contains(&"stable".to_string()));
}

#[test]
fn concurrent_writers_do_not_lose_nodes() {
    let ring = HashRing::new(5).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let ring = ring.clone();
            scope.spawn(move || {
                for i in 0..25 {
                    ring.add_node(&format!("w{worker}-n{i}"));
                }
            });
        }
    });

    assert_eq!(ring.size(), 100);
    let snapshot = ring.snapshot();
    assert_eq!(snapshot.vnode_count() + snapshot.collisions(), 500);
}

// ============================================================================
// Properties
// ============================================================================

fn node_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..8).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    /// Property: ring contents depend only on the node set
    #[test]
    fn prop_insertion_order_irrelevant(nodes in node_set(), seed in any::<u64>()) {
        let forward = {
            let mut ring = RingSnapshot::new(8).unwrap();
            for node in &nodes {
                ring.add_node(node);
            }
            ring
        };

        let mut shuffled = nodes.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        shuffled.reverse();
        let mut other = RingSnapshot::new(8).unwrap();
        for node in &shuffled {
            other.add_node(node);
        }

        let a: Vec<(u32, &str)> = forward.positions().collect();
        let b: Vec<(u32, &str)> = other.positions().collect();
        prop_assert_eq!(a, b);
    }

    /// Property: every key maps to a current member
    #[test]
    fn prop_owner_is_member(nodes in node_set(), key in ".{0,24}", drop_first in any::<bool>()) {
        let mut ring = RingSnapshot::new(4).unwrap();
        for node in &nodes {
            ring.add_node(node);
        }
        if drop_first {
            ring.remove_node(&nodes[0]);
        }

        match ring.get_node(&key) {
            Some(owner) => prop_assert!(ring.contains(owner)),
            None => prop_assert!(ring.is_empty()),
        }
    }

    /// Property: the sorted hash sequence never holds stale entries
    #[test]
    fn prop_positions_owned_by_members(nodes in node_set()) {
        let mut ring = RingSnapshot::new(6).unwrap();
        for node in &nodes {
            ring.add_node(node);
        }
        ring.remove_node(&nodes[nodes.len() / 2]);

        let positions: Vec<(u32, &str)> = ring.positions().collect();
        prop_assert_eq!(positions.len(), ring.vnode_count());
        prop_assert!(positions.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert!(positions.iter().all(|(_, owner)| ring.contains(owner)));
    }
}
