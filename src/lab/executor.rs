//! Runs a planned chain of reagents against an input value.

use tracing::{instrument, trace};

use crate::error::ReagentFailure;
use crate::reagent::ReagentId;
use crate::reagent_table::ReagentTable;
use crate::value::AnyValue;

/// Fire every reagent in `chain`, in order, starting from `input`.
///
/// There is no partial rollback: on failure the caller gets back which
/// reagent failed and why, and is expected to replan and re-execute from the
/// original input rather than resume mid-chain.
#[instrument(skip(reagents, input), fields(chain_len = chain.len()))]
pub fn execute_chain(
    reagents: &ReagentTable,
    chain: &[ReagentId],
    input: AnyValue,
) -> Result<AnyValue, (ReagentId, ReagentFailure)> {
    let mut value = input;
    for &id in chain {
        let reagent = reagents.get(id);
        trace!(reagent = id.index(), "firing reagent");
        value = (reagent.func)(value).map_err(|err| (id, err))?;
    }
    Ok(value)
}
