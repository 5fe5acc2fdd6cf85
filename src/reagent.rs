//! A single registered conversion step.

use crate::error::ReagentFailure;
use crate::substance::Substance;
use crate::value::AnyValue;
use crate::variation::TagState;

/// The opaque, type-erased function a reagent wraps.
///
/// Reagents are strictly `value -> value`: the core never inspects what a
/// function does, only whether it returned `Ok` or `Err`. A reagent that
/// would otherwise return something like `None` for an unsupported input
/// should return `Err` instead — there is no implicit "maybe" in this model.
pub type ReagentFn = Box<dyn Fn(AnyValue) -> Result<AnyValue, ReagentFailure> + Send + Sync>;

/// Identifies a reagent within a [`crate::lab::Lab`]'s registry.
///
/// Assigned at registration time, in registration order. Used instead of the
/// reagent's function (which is neither `Eq` nor `Hash`) wherever the planner
/// or executor needs to compare, ban, or key by "this particular reagent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReagentId(pub(crate) usize);

impl ReagentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One registered conversion step: a cost, an input/output substance pair,
/// the variations it depends on and contributes, and the function itself.
pub struct Reagent {
    pub id: ReagentId,
    pub cost: f64,
    pub cat_in: Substance,
    pub cat_out: Substance,
    pub req_in: TagState,
    pub prov_out: TagState,
    pub func: ReagentFn,
}

impl std::fmt::Debug for Reagent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reagent")
            .field("id", &self.id)
            .field("cost", &self.cost)
            .field("cat_in", &self.cat_in)
            .field("cat_out", &self.cat_out)
            .field("req_in", &self.req_in)
            .field("prov_out", &self.prov_out)
            .field("func", &"<opaque fn>")
            .finish()
    }
}

impl Reagent {
    /// Whether this reagent may fire given the current tag state — i.e. all
    /// of its `req_in` dependencies are present.
    pub fn satisfied_by(&self, state: &TagState) -> bool {
        self.req_in.is_subset(state)
    }
}
