//! Grow-only counter.

use std::collections::BTreeMap;

use concord_core::{ConcordError, ConfigValidation, CounterConfig, JoinSemilattice, Result};
use tracing::{debug, trace};

use crate::counts::ReplicaCounts;
use crate::wire::GCounterState;

/// Grow-only replicated counter.
///
/// Each replica increments only its own slot; merges take the key-wise
/// maximum, so replicas converge regardless of merge order, duplication or
/// loss of merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GCounter {
    /// Identity of the local replica.
    node_id: String,
    /// Known count per replica.
    counts: ReplicaCounts,
}

impl GCounter {
    /// Create a counter for replica `node_id`.
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            counts: ReplicaCounts::new(),
        }
    }

    /// Create a counter for the replica named in validated configuration.
    pub fn from_config(config: &CounterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.node_id.clone()))
    }

    /// Restore a counter from a previously captured state.
    pub fn from_state(state: GCounterState) -> Self {
        Self {
            node_id: state.node_id,
            counts: state.counts,
        }
    }

    /// Identity of the local replica.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Add 1 to the local slot.
    pub fn increment(&mut self) {
        self.counts.add(&self.node_id, 1);
    }

    /// Add `amount` to the local slot. Zero is ignored.
    pub fn increment_by(&mut self, amount: u64) {
        if amount == 0 {
            debug!(node_id = %self.node_id, "ignoring zero increment");
            return;
        }
        self.counts.add(&self.node_id, amount);
    }

    /// Strict form of [`increment_by`](Self::increment_by) for signed input.
    ///
    /// Rejects `amount <= 0` with [`ConcordError::InvalidAmount`].
    pub fn try_increment_by(&mut self, amount: i64) -> Result<()> {
        let amount = checked_amount(amount)?;
        self.counts.add(&self.node_id, amount);
        Ok(())
    }

    /// Sum over every known replica.
    pub fn value(&self) -> u64 {
        self.counts.total()
    }

    /// The local replica's own count.
    pub fn local_value(&self) -> u64 {
        self.counts.get(&self.node_id)
    }

    /// Merge another replica's counter into this one.
    pub fn merge(&mut self, other: &GCounter) {
        self.join_counts(&other.counts);
        trace!(
            node_id = %self.node_id,
            peer = %other.node_id,
            value = self.value(),
            "merged counter"
        );
    }

    /// Merge a raw peer snapshot as returned by [`get_counts`](Self::get_counts).
    pub fn merge_counts(&mut self, counts: &BTreeMap<String, u64>) {
        for (replica, count) in counts {
            self.counts.raise(replica, *count);
        }
        trace!(node_id = %self.node_id, value = self.value(), "merged peer counts");
    }

    /// Merge a decoded wire state.
    pub fn merge_state(&mut self, state: &GCounterState) {
        self.join_counts(&state.counts);
        trace!(
            node_id = %self.node_id,
            peer = %state.node_id,
            value = self.value(),
            "merged counter state"
        );
    }

    /// Independent copy of the per-replica counts.
    pub fn get_counts(&self) -> BTreeMap<String, u64> {
        self.counts.as_map().clone()
    }

    /// Borrow the per-replica counts.
    pub fn counts(&self) -> &ReplicaCounts {
        &self.counts
    }

    pub(crate) fn join_counts(&mut self, counts: &ReplicaCounts) {
        self.counts.join_assign(counts);
    }

    /// Capture the state for transmission or persistence.
    pub fn state(&self) -> GCounterState {
        GCounterState {
            node_id: self.node_id.clone(),
            counts: self.counts.clone(),
        }
    }
}

/// Join keeps the identity of the left-hand replica.
impl JoinSemilattice for GCounter {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    fn join_assign(&mut self, other: &Self) {
        self.merge(other);
    }
}

fn checked_amount(amount: i64) -> Result<u64> {
    u64::try_from(amount)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| ConcordError::invalid_amount(amount))
}
