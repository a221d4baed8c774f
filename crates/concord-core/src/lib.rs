//! Concord Core - shared foundation
//!
//! This crate holds the pieces that both Concord components build on. It has
//! no knowledge of rings or counters.
//!
//! # Contents
//!
//! - [`semilattice`]: `JoinSemilattice`, `Bottom` and `CvState`, the algebra
//!   every state-based CRDT in the workspace implements
//! - [`errors`]: the unified [`ConcordError`] type and [`Result`] alias
//! - [`config`]: serde/TOML configuration with environment overrides
//! - [`hash`]: the deterministic FNV-1a based hash that places keys on the ring
//!
//! ## Semilattice laws
//! - Commutativity: `a ⊔ b = b ⊔ a`
//! - Associativity: `(a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)`
//! - Idempotency: `a ⊔ a = a`
//! - Identity: `a ⊔ ⊥ = a`

#![forbid(unsafe_code)]

/// Join-semilattice traits for state-based CRDTs
pub mod semilattice;

/// Unified error handling
pub mod errors;

/// Configuration types, loading and validation
pub mod config;

/// Deterministic non-cryptographic hashing
pub mod hash;

pub use config::{ConcordConfig, ConfigValidation, CounterConfig, RingConfig};
pub use errors::{ConcordError, Result};
pub use hash::{fnv1a_32, ring_hash};
pub use semilattice::{Bottom, CvState, JoinSemilattice};
