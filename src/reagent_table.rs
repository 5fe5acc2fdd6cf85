//! The registry's two parallel cost-ordered indexes over reagents.

use std::collections::HashMap;

use crate::reagent::{Reagent, ReagentFn, ReagentId};
use crate::substance::Substance;
use crate::variation::TagState;

/// Append-only storage for registered reagents, indexed two ways:
/// by the substance they consume (`by_in`) and by the substance they produce
/// (`by_out`), each ordered ascending by cost with ties broken by insertion
/// order. The planner never mutates this table; only `stock_reagent` grows it.
#[derive(Default)]
pub struct ReagentTable {
    reagents: Vec<Reagent>,
    by_in: HashMap<Substance, Vec<ReagentId>>,
    by_out: HashMap<Substance, Vec<ReagentId>>,
}

impl ReagentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reagent and return its assigned id.
    ///
    /// Both indexes are re-sorted by cost after insertion using a stable
    /// sort, so a newly registered reagent lands after any existing reagent
    /// of equal cost — the insertion-order tie-break the planner relies on
    /// for deterministic output (see P4 in the design notes).
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        cost: f64,
        cat_in: Substance,
        req_in: TagState,
        cat_out: Substance,
        prov_out: TagState,
        func: ReagentFn,
    ) -> ReagentId {
        let id = ReagentId(self.reagents.len());
        self.reagents.push(Reagent {
            id,
            cost,
            cat_in,
            cat_out,
            req_in,
            prov_out,
            func,
        });

        self.by_in.entry(cat_in).or_default().push(id);
        self.by_out.entry(cat_out).or_default().push(id);
        self.sort_by_cost(cat_in, true);
        self.sort_by_cost(cat_out, false);

        id
    }

    fn sort_by_cost(&mut self, substance: Substance, is_in: bool) {
        let reagents = &self.reagents;
        let index = if is_in {
            self.by_in.get_mut(&substance)
        } else {
            self.by_out.get_mut(&substance)
        };
        if let Some(ids) = index {
            ids.sort_by(|a, b| {
                reagents[a.index()]
                    .cost
                    .partial_cmp(&reagents[b.index()].cost)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    /// Reagents whose `cat_in` equals `substance`, ascending by cost.
    pub fn reagents_from(&self, substance: Substance) -> &[ReagentId] {
        self.by_in.get(&substance).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Reagents whose `cat_out` equals `substance`, ascending by cost.
    pub fn reagents_to(&self, substance: Substance) -> &[ReagentId] {
        self.by_out.get(&substance).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, id: ReagentId) -> &Reagent {
        &self.reagents[id.index()]
    }

    pub fn len(&self) -> usize {
        self.reagents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reagents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reagent> {
        self.reagents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReagentFailure;
    use crate::value::{unwrap, wrap};

    fn noop(cost: f64, cat_in: Substance, cat_out: Substance) -> (f64, Substance, TagState, Substance, TagState, ReagentFn) {
        let func: ReagentFn = Box::new(move |v| {
            let s = unwrap::<String>(v).map_err(|_| ReagentFailure::new("TypeError", "expected String"))?;
            Ok(wrap(s))
        });
        (cost, cat_in, TagState::new(), cat_out, TagState::new(), func)
    }

    #[test]
    fn orders_by_cost_then_insertion() {
        let mut table = ReagentTable::new();
        let a = Substance::of("A");
        let b = Substance::of("B");

        let (c1, i1, r1, o1, p1, f1) = noop(2.0, a, b);
        let first = table.register(c1, i1, r1, o1, p1, f1);
        let (c2, i2, r2, o2, p2, f2) = noop(1.0, a, b);
        let second = table.register(c2, i2, r2, o2, p2, f2);
        let (c3, i3, r3, o3, p3, f3) = noop(1.0, a, b);
        let third = table.register(c3, i3, r3, o3, p3, f3);

        let order = table.reagents_from(a);
        assert_eq!(order, &[second, third, first]);
    }

    #[test]
    fn unregistered_substance_returns_empty() {
        let table = ReagentTable::new();
        assert!(table.reagents_from(Substance::of("nothing")).is_empty());
    }
}
