//! Per-replica count lattice.

use std::collections::BTreeMap;

use concord_core::{Bottom, CvState, JoinSemilattice};
use serde::{Deserialize, Serialize};

/// Mapping from replica id to a natural number.
///
/// Join is the key-wise maximum over the union of keys, with a missing key
/// read as 0. Entries never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaCounts(BTreeMap<String, u64>);

impl ReplicaCounts {
    /// Create an empty (bottom) mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Count recorded for `replica`, 0 if unknown.
    pub fn get(&self, replica: &str) -> u64 {
        self.0.get(replica).copied().unwrap_or(0)
    }

    /// Add `amount` to the entry for `replica`, saturating at `u64::MAX`.
    pub fn add(&mut self, replica: &str, amount: u64) {
        let slot = self.slot(replica);
        *slot = slot.saturating_add(amount);
    }

    /// Raise the entry for `replica` to at least `count`.
    ///
    /// Returns `true` if the stored value grew.
    pub fn raise(&mut self, replica: &str, count: u64) -> bool {
        let slot = self.slot(replica);
        if count > *slot {
            *slot = count;
            true
        } else {
            false
        }
    }

    /// Sum over every replica, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// Number of known replicas.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no replica is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in replica id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.0.iter().map(|(id, count)| (id.as_str(), *count))
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.0
    }

    fn slot(&mut self, replica: &str) -> &mut u64 {
        self.0.entry(replica.to_string()).or_insert(0)
    }
}

impl From<BTreeMap<String, u64>> for ReplicaCounts {
    fn from(map: BTreeMap<String, u64>) -> Self {
        Self(map)
    }
}

impl JoinSemilattice for ReplicaCounts {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.join_assign(other);
        result
    }

    fn join_assign(&mut self, other: &Self) {
        for (replica, count) in &other.0 {
            self.0
                .entry(replica.clone())
                .and_modify(|c| *c = (*c).max(*count))
                .or_insert(*count);
        }
    }
}

impl Bottom for ReplicaCounts {
    fn bottom() -> Self {
        Self::new()
    }
}

impl CvState for ReplicaCounts {}
