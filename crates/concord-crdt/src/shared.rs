//! Thread-safe counter handle.
//!
//! ## Lock Usage
//!
//! Uses `parking_lot::Mutex` around the whole counter because every
//! operation is short and synchronous. Merges and increments on one handle
//! are linearized; the lattice join makes their relative order irrelevant to
//! the converged value.

use std::sync::Arc;

use concord_core::JoinSemilattice;
use parking_lot::Mutex;

use crate::gcounter::GCounter;
use crate::pncounter::PNCounter;

/// Cloneable, lock-protected handle to a counter shared between threads.
#[derive(Debug, Default)]
pub struct SharedCounter<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedCounter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: JoinSemilattice> SharedCounter<C> {
    /// Wrap `counter` for shared use.
    pub fn new(counter: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(counter)),
        }
    }

    /// Run `f` with shared access to the counter.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access to the counter.
    pub fn update<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Join `other` into the shared counter.
    pub fn merge(&self, other: &C) {
        self.inner.lock().join_assign(other);
    }

    /// Point-in-time copy of the counter.
    pub fn snapshot(&self) -> C {
        self.inner.lock().clone()
    }
}

impl SharedCounter<GCounter> {
    /// See [`GCounter::increment`].
    pub fn increment(&self) {
        self.update(GCounter::increment);
    }

    /// See [`GCounter::increment_by`].
    pub fn increment_by(&self, amount: u64) {
        self.update(|c| c.increment_by(amount));
    }

    /// See [`GCounter::value`].
    pub fn value(&self) -> u64 {
        self.read(GCounter::value)
    }
}

impl SharedCounter<PNCounter> {
    /// See [`PNCounter::increment`].
    pub fn increment(&self) {
        self.update(PNCounter::increment);
    }

    /// See [`PNCounter::decrement`].
    pub fn decrement(&self) {
        self.update(PNCounter::decrement);
    }

    /// See [`PNCounter::value`].
    pub fn value(&self) -> i64 {
        self.read(PNCounter::value)
    }
}
