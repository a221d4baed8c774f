//! # Concord CRDT - replicated counters
//!
//! State-based counters that converge to the same value on every replica
//! once all replicas have (transitively) seen each other's state, regardless
//! of merge order, duplication or loss of individual merges.
//!
//! - [`GCounter`]: grow-only counter, one slot per replica
//! - [`PNCounter`]: pair of grow-only halves, supports decrements
//! - [`ReplicaCounts`]: the per-replica map both are built from, a full
//!   [`CvState`](concord_core::CvState)
//! - [`SharedCounter`]: mutex-protected handle for multi-threaded use
//! - [`GCounterState`] / [`PNCounterState`]: serializable states for transport
//!
//! ```
//! use concord_crdt::GCounter;
//!
//! let mut a = GCounter::new("node-a");
//! let mut b = GCounter::new("node-b");
//! a.increment_by(5);
//! b.increment_by(3);
//!
//! a.merge(&b);
//! b.merge(&a);
//! assert_eq!(a.value(), 8);
//! assert_eq!(a.value(), b.value());
//! ```

#![forbid(unsafe_code)]

mod counts;
mod gcounter;
mod pncounter;
mod shared;
mod wire;

pub use counts::ReplicaCounts;
pub use gcounter::GCounter;
pub use pncounter::PNCounter;
pub use shared::SharedCounter;
pub use wire::{GCounterState, PNCounterState};
