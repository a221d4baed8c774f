//! Positive/negative counter built from two grow-only halves.

use concord_core::{ConfigValidation, CounterConfig, JoinSemilattice, Result};
use tracing::trace;

use crate::counts::ReplicaCounts;
use crate::gcounter::GCounter;
use crate::wire::{GCounterState, PNCounterState};

/// Replicated counter supporting increments and decrements.
///
/// Increments and decrements are tracked by two grow-only counters keyed by
/// the same replica id; the value is their difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PNCounter {
    p: GCounter,
    n: GCounter,
}

impl PNCounter {
    /// Create a counter for replica `node_id`.
    pub fn new(node_id: impl Into<String>) -> Self {
        let node_id = node_id.into();
        Self {
            p: GCounter::new(node_id.clone()),
            n: GCounter::new(node_id),
        }
    }

    /// Create a counter for the replica named in validated configuration.
    pub fn from_config(config: &CounterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.node_id.clone()))
    }

    /// Restore a counter from a previously captured state.
    pub fn from_state(state: PNCounterState) -> Self {
        Self {
            p: GCounter::from_state(GCounterState {
                node_id: state.node_id.clone(),
                counts: state.positive,
            }),
            n: GCounter::from_state(GCounterState {
                node_id: state.node_id,
                counts: state.negative,
            }),
        }
    }

    /// Identity of the local replica.
    pub fn node_id(&self) -> &str {
        self.p.node_id()
    }

    /// Record one increment.
    pub fn increment(&mut self) {
        self.p.increment();
    }

    /// Record one decrement.
    pub fn decrement(&mut self) {
        self.n.increment();
    }

    /// Record `amount` increments. Zero is ignored.
    pub fn increment_by(&mut self, amount: u64) {
        self.p.increment_by(amount);
    }

    /// Record `amount` decrements. Zero is ignored.
    pub fn decrement_by(&mut self, amount: u64) {
        self.n.increment_by(amount);
    }

    /// Strict increment for signed input; rejects `amount <= 0`.
    pub fn try_increment_by(&mut self, amount: i64) -> Result<()> {
        self.p.try_increment_by(amount)
    }

    /// Strict decrement for signed input; rejects `amount <= 0`.
    pub fn try_decrement_by(&mut self, amount: i64) -> Result<()> {
        self.n.try_increment_by(amount)
    }

    /// Total increments minus total decrements, clamped to the `i64` range.
    pub fn value(&self) -> i64 {
        clamp(i128::from(self.p.value()) - i128::from(self.n.value()))
    }

    /// The local replica's own contribution.
    pub fn local_value(&self) -> i64 {
        clamp(i128::from(self.p.local_value()) - i128::from(self.n.local_value()))
    }

    /// Per-replica increments.
    pub fn positive(&self) -> &ReplicaCounts {
        self.p.counts()
    }

    /// Per-replica decrements.
    pub fn negative(&self) -> &ReplicaCounts {
        self.n.counts()
    }

    /// Merge another replica's counter into this one.
    ///
    /// Both halves are merged independently with key-wise max.
    pub fn merge(&mut self, other: &PNCounter) {
        self.p.join_counts(other.positive());
        self.n.join_counts(other.negative());
        trace!(
            node_id = %self.node_id(),
            peer = %other.node_id(),
            value = self.value(),
            "merged counter"
        );
    }

    /// Merge a decoded wire state.
    pub fn merge_state(&mut self, state: &PNCounterState) {
        self.p.join_counts(&state.positive);
        self.n.join_counts(&state.negative);
        trace!(
            node_id = %self.node_id(),
            peer = %state.node_id,
            value = self.value(),
            "merged counter state"
        );
    }

    /// Capture the state for transmission or persistence.
    pub fn state(&self) -> PNCounterState {
        PNCounterState {
            node_id: self.node_id().to_string(),
            positive: self.positive().clone(),
            negative: self.negative().clone(),
        }
    }
}

impl JoinSemilattice for PNCounter {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    fn join_assign(&mut self, other: &Self) {
        self.merge(other);
    }
}

fn clamp(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}
