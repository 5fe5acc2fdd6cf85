//! The registry and planning coordinator.

mod executor;
mod export;
mod planner;

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use crate::activator::ActivatorFn;
use crate::activator_table::ActivatorTable;
use crate::config::TransmuteConfig;
use crate::error::{LabError, ReagentFailure};
use crate::reagent::{ReagentFn, ReagentId};
use crate::reagent_table::ReagentTable;
use crate::request::TransmuteRequest;
use crate::substance::Substance;
use crate::value::{wrap, AnyValue};
use crate::variation::TagState;

pub use planner::LackingReagent;

/// Owns a reagent table and an activator table, and plans/executes
/// transmutation chains over them.
///
/// A `Lab` has no interior mutability and no shared state beyond what its two
/// tables hold — `stock_reagent`/`stock_activator` grow it, `transmute` reads
/// it. Nothing about planning or execution mutates the registry.
#[derive(Default)]
pub struct Lab {
    reagents: ReagentTable,
    activators: ActivatorTable,
}

impl Lab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reagent: a single-step conversion from `cat_in` (carrying
    /// every tag in `req_in`) to `cat_out` (contributing every tag in
    /// `prov_out`). Returns the id the planner and any retry logic will use
    /// to refer back to this specific reagent.
    #[allow(clippy::too_many_arguments)]
    pub fn stock_reagent(
        &mut self,
        cost: f64,
        cat_in: Substance,
        req_in: TagState,
        cat_out: Substance,
        prov_out: TagState,
        func: ReagentFn,
    ) -> ReagentId {
        self.reagents.register(cost, cat_in, req_in, cat_out, prov_out, func)
    }

    /// Register an activator: an inspector consulted for `substance` values
    /// when a caller doesn't supply explicit source tags.
    pub fn stock_activator(&mut self, substance: Substance, inspector: ActivatorFn) {
        self.activators.register(substance, inspector);
    }

    /// Plan and execute a transmutation chain per `request`, using
    /// [`TransmuteConfig::default`].
    ///
    /// `value` must be `Clone`: retry-by-banning reruns the whole chain from
    /// the original input rather than rolling back partial state (see
    /// [`Lab::transmute_with_config`]), so the input has to be reproducible
    /// across attempts. Only the starting value carries this bound —
    /// intermediate values produced mid-chain stay fully type-erased.
    pub fn transmute<T: Clone + Send + 'static>(
        &self,
        value: T,
        request: TransmuteRequest,
    ) -> Result<AnyValue, LabError> {
        self.transmute_with_config(value, request, &TransmuteConfig::default())
    }

    /// Plan and execute a transmutation chain, with explicit control over
    /// the retry budget.
    ///
    /// On each attempt: plan a least-cost chain avoiding every previously
    /// failed reagent, run it from a fresh clone of the original `value`, and
    /// if it fails, ban the reagent that failed and retry. A
    /// [`LabError::LackingReagent`] from the planner is never downgraded to a
    /// later failure kind — even on a retry after prior execution failures,
    /// it propagates immediately.
    #[instrument(skip(self, value, request, config), fields(retry_budget = config.retry_budget, explicit = request.explicit))]
    pub fn transmute_with_config<T: Clone + Send + 'static>(
        &self,
        value: T,
        request: TransmuteRequest,
        config: &TransmuteConfig,
    ) -> Result<AnyValue, LabError> {
        let src_cat = request.src_cat.unwrap_or_else(Substance::of_type::<T>);
        let dst_cat = request.dst_cat;
        let dst_tags = request.dst_tags;

        let mut src_tags = request.src_tags;
        if !request.explicit {
            src_tags.extend(self.activators.detect(src_cat, &wrap(value.clone())));
        }

        let mut barred: HashSet<ReagentId> = HashSet::new();
        let mut attempts: Vec<ReagentFailure> = Vec::new();

        for attempt in 0..config.retry_budget.max(1) {
            let chain = match planner::search(&self.reagents, src_cat, &src_tags, dst_cat, &dst_tags, &barred) {
                Err(LackingReagent) => {
                    warn!("no reagent can start or terminate the requested transmutation");
                    return Err(LabError::LackingReagent);
                }
                Ok(None) => {
                    if attempts.is_empty() {
                        warn!("no chain of reagents connects the requested substances");
                        return Err(LabError::NoChain);
                    }
                    break;
                }
                Ok(Some(chain)) => chain,
            };

            info!(attempt, chain_len = chain.len(), "executing planned chain");
            match executor::execute_chain(&self.reagents, &chain, wrap(value.clone())) {
                Ok(result) => return Ok(result),
                Err((failed_id, failure)) => {
                    warn!(reagent = failed_id.index(), %failure, "reagent failed, banning and retrying");
                    barred.insert(failed_id);
                    attempts.push(failure);
                }
            }
        }

        Err(LabError::CommandFailure { attempts })
    }

    /// Render the registry as a Graphviz DOT document.
    pub fn export_dot(&self) -> String {
        export::export_dot(&self.reagents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::unwrap;

    fn string_reagent(suffix: &'static str) -> ReagentFn {
        Box::new(move |v| {
            let s = unwrap::<String>(v).map_err(|_| ReagentFailure::new("TypeError", "expected String"))?;
            Ok(wrap(format!("{s}{suffix}")))
        })
    }

    #[test]
    fn chains_two_reagents() {
        let mut lab = Lab::new();
        let a = Substance::of("A");
        let b = Substance::of("B");
        let c = Substance::of("C");
        lab.stock_reagent(1.0, a, TagState::new(), b, TagState::new(), string_reagent("->B"));
        lab.stock_reagent(1.0, b, TagState::new(), c, TagState::new(), string_reagent("->C"));

        let request = TransmuteRequest::new(c).src_cat(a);
        let result = lab.transmute("start".to_string(), request).unwrap();
        assert_eq!(unwrap::<String>(result).unwrap(), "start->B->C");
    }

    #[test]
    fn lacking_reagent_is_immediate() {
        let lab = Lab::new();
        let request = TransmuteRequest::new(Substance::of("Z")).src_cat(Substance::of("A"));
        let err = lab.transmute("start".to_string(), request).unwrap_err();
        assert!(matches!(err, LabError::LackingReagent));
    }

    #[test]
    fn retries_around_a_failing_reagent() {
        let mut lab = Lab::new();
        let a = Substance::of("A");
        let b = Substance::of("B");
        lab.stock_reagent(
            1.0,
            a,
            TagState::new(),
            b,
            TagState::new(),
            Box::new(|_| Err(ReagentFailure::new("RuntimeError", "always fails"))),
        );
        lab.stock_reagent(2.0, a, TagState::new(), b, TagState::new(), string_reagent("->B"));

        let request = TransmuteRequest::new(b).src_cat(a);
        let result = lab.transmute("start".to_string(), request).unwrap();
        assert_eq!(unwrap::<String>(result).unwrap(), "start->B");
    }

    #[test]
    fn falls_back_to_type_substance_when_src_cat_omitted() {
        let mut lab = Lab::new();
        let a = Substance::of_type::<String>();
        let b = Substance::of("B");
        lab.stock_reagent(1.0, a, TagState::new(), b, TagState::new(), string_reagent("->B"));

        let request = TransmuteRequest::new(b);
        let result = lab.transmute("start".to_string(), request).unwrap();
        assert_eq!(unwrap::<String>(result).unwrap(), "start->B");
    }
}
