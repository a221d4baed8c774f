//! Join-semilattice abstraction
//!
//! State-based CRDTs (CvRDTs) converge because their merge is a join: the
//! least upper bound of two states. Any type implementing [`JoinSemilattice`]
//! must make `join` commutative, associative and idempotent. These laws are
//! not checked by the compiler; each implementation carries property tests.

/// A type with a least-upper-bound operation.
pub trait JoinSemilattice: Clone {
    /// Compute `self ⊔ other`.
    fn join(&self, other: &Self) -> Self;

    /// Replace `self` with `self ⊔ other`.
    ///
    /// Implementations that can merge in place should override this to avoid
    /// the intermediate clone.
    fn join_assign(&mut self, other: &Self) {
        *self = self.join(other);
    }
}

/// The identity element for [`JoinSemilattice::join`]: `a ⊔ ⊥ = a`.
pub trait Bottom {
    /// Return the bottom element.
    fn bottom() -> Self;
}

/// Marker for a complete state-based CRDT: a join-semilattice with a bottom.
pub trait CvState: JoinSemilattice + Bottom {}

/// Join every state in `states` starting from bottom.
///
/// The result does not depend on iteration order.
pub fn join_all<'a, S, I>(states: I) -> S
where
    S: CvState + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut acc = S::bottom();
    for state in states {
        acc.join_assign(state);
    }
    acc
}
