//! The registry's map from substance to the activators that inspect it.

use std::collections::HashMap;

use crate::activator::ActivatorFn;
use crate::substance::Substance;
use crate::value::AnyValue;
use crate::variation::Variation;

/// Append-only storage for registered activators, indexed by the substance
/// they inspect.
#[derive(Default)]
pub struct ActivatorTable {
    by_cat: HashMap<Substance, Vec<ActivatorFn>>,
}

impl ActivatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, substance: Substance, inspector: ActivatorFn) {
        self.by_cat.entry(substance).or_default().push(inspector);
    }

    /// Run every activator registered for `substance` against `value`, in
    /// registration order, concatenating their yielded variations.
    pub fn detect(&self, substance: Substance, value: &AnyValue) -> Vec<Variation> {
        self.by_cat
            .get(&substance)
            .into_iter()
            .flatten()
            .flat_map(|inspector| inspector(value))
            .collect()
    }
}
