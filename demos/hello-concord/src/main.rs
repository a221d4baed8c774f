//! # Hello Concord
//!
//! Walks through the two halves of Concord:
//! - Placing keys on a consistent hash ring and watching how few move when
//!   membership changes
//! - Replicating counters across nodes and merging them back to one value
//!
//! Configuration is read from the TOML file given as the first argument (if
//! any), then `CONCORD_RING_REPLICAS` / `CONCORD_NODE_ID`. The replica
//! identity has no default and must come from one of them.
//!
//! Run with: `CONCORD_NODE_ID=replica-a cargo run -p hello-concord [config.toml]`
//! Set `RUST_LOG=debug` to see ring placement and merge tracing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use concord_core::config::ENV_NODE_ID;
use concord_core::ConcordConfig;
use concord_crdt::{GCounter, GCounterState, PNCounter};
use concord_ring::{HashRing, RingSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ConcordConfig::load(config_path.as_deref()).with_context(|| {
        format!("loading Concord configuration (set {ENV_NODE_ID} or counter.node_id)")
    })?;
    info!(
        replicas = config.ring.replicas,
        node_id = %config.counter.node_id,
        "configuration loaded"
    );

    ring_walkthrough(&config)?;
    counter_walkthrough(&config)?;

    println!("=== Done ===");
    Ok(())
}

fn ring_walkthrough(config: &ConcordConfig) -> Result<()> {
    println!("=== Consistent hash ring ===\n");

    let ring = HashRing::from_config(&config.ring)?;
    for server in ["server-1", "server-2", "server-3"] {
        ring.add_node(server);
    }
    println!("Members: {:?}", ring.get_nodes());

    for key in ["user:123", "user:456", "user:789"] {
        let owner = ring.get_node(key).context("populated ring returned no owner")?;
        println!("  {key:<10} -> {owner}");
    }
    println!("  replicas for user:123: {:?}\n", ring.get_nodes_for("user:123", 2));

    let keys: Vec<String> = (0..10_000).map(|i| format!("key-{i}")).collect();
    let before = ring.snapshot();
    ring.add_node("server-4");
    let after = ring.snapshot();
    let moved = RingSnapshot::churn_ratio(&before, &after, keys.iter().map(String::as_str));
    println!("Adding server-4 moved {:.1}% of {} keys", moved * 100.0, keys.len());

    ring.remove_node("server-2");
    let orphaned = keys
        .iter()
        .filter(|k| ring.get_node(k).as_deref() == Some("server-2"))
        .count();
    println!("Removing server-2 left {orphaned} keys on it\n");

    Ok(())
}

fn counter_walkthrough(config: &ConcordConfig) -> Result<()> {
    println!("=== Replicated counters ===\n");

    let mut local = GCounter::from_config(&config.counter)?;
    let mut peer = GCounter::new("peer");
    local.increment();
    local.increment_by(4);
    peer.increment_by(3);
    println!("Before merge: local={} peer={}", local.value(), peer.value());

    // Ship the peer's state as JSON, as a gossip message would.
    let message = serde_json::to_string(&peer.state())?;
    let received: GCounterState = serde_json::from_str(&message)?;
    local.merge_state(&received);
    peer.merge(&local);
    println!("After merge:  local={} peer={}", local.value(), peer.value());
    anyhow::ensure!(local.value() == peer.value(), "counters diverged");

    local.merge_state(&received);
    println!("Re-merging the same state keeps value {}\n", local.value());

    let mut likes = PNCounter::from_config(&config.counter)?;
    let mut remote = PNCounter::new("peer");
    likes.increment_by(3);
    likes.decrement();
    remote.increment();
    remote.decrement_by(2);
    likes.merge(&remote);
    println!(
        "PN counter: +{} -{} = {}\n",
        likes.positive().total(),
        likes.negative().total(),
        likes.value()
    );

    Ok(())
}
