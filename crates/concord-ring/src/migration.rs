//! Key movement between two ring states.

use crate::snapshot::RingSnapshot;

/// A key whose owner changed between two ring snapshots.
///
/// `from` or `to` is `None` when the corresponding ring was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The key that must move.
    pub key: String,
    /// Owner in the old ring.
    pub from: Option<String>,
    /// Owner in the new ring.
    pub to: Option<String>,
}

impl RingSnapshot {
    /// Every key in `keys` whose owner differs between `old` and `new`.
    pub fn migrations<'a, I>(old: &RingSnapshot, new: &RingSnapshot, keys: I) -> Vec<Migration>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter_map(|key| {
                let from = old.get_node(key);
                let to = new.get_node(key);
                (from != to).then(|| Migration {
                    key: key.to_string(),
                    from: from.map(str::to_owned),
                    to: to.map(str::to_owned),
                })
            })
            .collect()
    }

    /// Fraction of `keys` whose owner differs between `old` and `new`.
    ///
    /// Returns 0.0 for an empty key set.
    pub fn churn_ratio<'a, I>(old: &RingSnapshot, new: &RingSnapshot, keys: I) -> f64
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut total = 0usize;
        let mut moved = 0usize;
        for key in keys {
            total += 1;
            if old.get_node(key) != new.get_node(key) {
                moved += 1;
            }
        }
        if total == 0 {
            0.0
        } else {
            moved as f64 / total as f64
        }
    }
}
