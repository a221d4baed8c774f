//! # Concord Ring - consistent hashing
//!
//! Maps string keys onto a dynamic set of named nodes. Each physical node is
//! placed on a 32-bit ring at `replicas` virtual positions, hashed from
//! `"<node>-<i>"`. A key belongs to the first virtual position at or after its
//! own hash, wrapping past the top of the ring.
//!
//! Adding or removing a node moves roughly `1/N` of the keyspace; every other
//! key keeps its owner.
//!
//! ## Types
//!
//! - [`RingSnapshot`]: owned, immutable-by-convention ring state with `&mut`
//!   membership methods. Single-threaded callers can use it directly.
//! - [`HashRing`]: shareable handle publishing snapshots through `ArcSwap`.
//!   Lookups are lock-free; membership changes serialize on a mutex.
//! - [`Migration`]: a key whose owner differs between two snapshots.
//!
//! ```
//! use concord_ring::HashRing;
//!
//! let ring = HashRing::new(3)?;
//! ring.add_node("server-1");
//! ring.add_node("server-2");
//!
//! let owner = ring.get_node("user:123");
//! assert!(owner.is_some());
//! assert_eq!(owner, ring.get_node("user:123"));
//! # Ok::<(), concord_core::ConcordError>(())
//! ```

#![forbid(unsafe_code)]

mod migration;
mod ring;
mod snapshot;

pub use migration::Migration;
pub use ring::HashRing;
pub use snapshot::RingSnapshot;
