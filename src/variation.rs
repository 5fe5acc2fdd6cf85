//! Opaque tag tokens ("variations") governing reagent dependencies.
//!
//! A variation refines a substance: a dependency a reagent requires before it
//! may fire (`req_in`), or a capability a reagent contributes after firing
//! (`prov_out`). The core only ever compares variations for equality and
//! combines them with set operations, so, like [`crate::substance::Substance`],
//! they're represented as a stable hash of whatever key produced them.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The set of variations available at some point in planning or execution.
///
/// `BTreeSet` (rather than `HashSet`) so the whole state is itself `Hash`able
/// and can be used as a visited-node key in the planner.
pub type TagState = BTreeSet<Variation>;

/// An opaque, hashable token standing in for a tag/dependency/capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variation(u64);

impl Variation {
    /// Build a variation token from any hashable key.
    pub fn of<K: Hash + ?Sized>(key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Variation(hasher.finish())
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Build a set of variations from any iterable of hashable keys, de-duplicating
/// as required by `stock_reagent`'s `req_in`/`prov_out` parameters.
pub fn variation_set<K, I>(keys: I) -> TagState
where
    K: Hash,
    I: IntoIterator<Item = K>,
{
    keys.into_iter().map(|k| Variation::of(&k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_into_a_set() {
        let set = variation_set(["var", "var", "other"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn equal_keys_equal_variation() {
        assert_eq!(Variation::of("var"), Variation::of("var"));
    }
}
