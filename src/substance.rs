//! Opaque category tokens ("substances") used to key the reagent table.
//!
//! The original dynamically-typed implementation this crate generalizes used
//! `hash(type_in)` directly: any hashable Python object could stand in for a
//! category. A statically typed registry can't be generic over "whatever
//! hashable key the caller feels like using" without becoming generic over a
//! category type, which would prevent heterogeneous category kinds (string
//! keys, `TypeId` keys, composite enum keys) from coexisting in one registry.
//! `Substance` sidesteps this the same way: it's a stable hash of whatever key
//! produced it, so the registry itself only ever deals in one concrete type.

use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An opaque, hashable token standing in for a conversion category.
///
/// Two `Substance` values are equal iff they were built from keys that hash
/// identically. Construct one via [`Substance::of`] for an arbitrary hashable
/// key, or [`Substance::of_type`] for the common "categorize by Rust type"
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Substance(u64);

impl Substance {
    /// Build a substance token from any hashable key.
    pub fn of<K: Hash + ?Sized>(key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Substance(hasher.finish())
    }

    /// Build a substance token from a Rust type, for registries that
    /// categorize values by their concrete type the way the original
    /// dynamically-typed implementation categorized by `type(value)`.
    pub fn of_type<T: 'static>() -> Self {
        Substance::of(&TypeId::of::<T>())
    }

    /// The raw hash backing this token, exposed for diagnostics (DOT export,
    /// logging) where a stable label is more useful than the `Debug` form.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_substance() {
        assert_eq!(Substance::of("http-url"), Substance::of("http-url"));
    }

    #[test]
    fn different_keys_different_substance() {
        assert_ne!(Substance::of("http-url"), Substance::of("file-path"));
    }

    #[test]
    fn of_type_is_stable_per_type() {
        assert_eq!(Substance::of_type::<String>(), Substance::of_type::<String>());
        assert_ne!(Substance::of_type::<String>(), Substance::of_type::<u32>());
    }
}
