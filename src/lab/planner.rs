//! Bidirectional Dijkstra search over the reagent table, with a tag algebra
//! layered on top of plain cost so that dependency/capability constraints are
//! enforced as hard filters rather than folded into the edge weights.
//!
//! This mirrors the original implementation's `_search` method closely
//! enough that the six pinned scenarios in the crate's integration tests
//! reproduce its exact chains, including one faithfully-preserved quirk in
//! the forward relaxation (see the comment on [`relax_forward`]).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::rc::Rc;

use tracing::{instrument, trace};

use crate::reagent::ReagentId;
use crate::reagent_table::ReagentTable;
use crate::substance::Substance;
use crate::variation::TagState;

/// A search state: "we arrived via `reagent`, with this tag state afterward".
struct SearchNode {
    reagent: ReagentId,
    parent: Option<Rc<SearchNode>>,
    cost: f64,
    state_after: TagState,
}

impl SearchNode {
    /// The tag state this node's *parent* left behind — or the search root's
    /// initial tags, if this node has no parent. Used both as the visited-key
    /// and as the supply/obligation compared against the opposing frontier.
    fn parent_state(&self, root_tags: &TagState) -> TagState {
        match &self.parent {
            Some(p) => p.state_after.clone(),
            None => root_tags.clone(),
        }
    }
}

/// Min-heap entry ordered by `(priority, seq)` so that equal-priority nodes
/// pop in the order they were pushed (P4: determinism).
struct QueueEntry {
    priority: f64,
    seq: u64,
    node: Rc<SearchNode>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest priority
        // first, breaking ties by the earliest insertion sequence.
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Visited-node key: the firing reagent plus the tag state its *parent* left
/// behind (`None` for a root seed). Keying on the parent's state, not the
/// node's own, is what lets the meet-in-the-middle check retain multiple
/// arrivals at the same reagent carrying different prior supplies.
type VisitedKey = Option<TagState>;

/// Per-reagent visited entries, in insertion order.
///
/// A plain `HashMap<VisitedKey, _>` would iterate in an order that varies
/// between process runs, which the meet-in-the-middle check's first-match
/// semantics would then expose as a nondeterministic choice of chain when
/// more than one visited entry exists for the same reagent. The original's
/// `dict` iterates in insertion order; a `Vec` with linear lookup is the
/// direct equivalent for the handful of entries any one reagent accumulates.
type VisitedSlot = Vec<(VisitedKey, Rc<SearchNode>)>;
type VisitedTable = HashMap<ReagentId, VisitedSlot>;

fn slot_contains(slot: &[(VisitedKey, Rc<SearchNode>)], key: &VisitedKey) -> bool {
    slot.iter().any(|(k, _)| k == key)
}

/// Raised when the registry has no reagent that could possibly start the
/// chain (with a satisfiable dependency set) or none that could end it.
/// Distinct from an exhausted search: this is checked before either frontier
/// does any work, and is never downgraded to a later failure kind even if
/// raised on a retry after prior execution errors.
#[derive(Debug, Clone, Copy)]
pub struct LackingReagent;

/// Find a least-cost chain of reagents from `src_cat` (carrying `src_tags`)
/// to `dst_cat` (requiring `dst_tags`), avoiding every reagent in `barred`.
///
/// Returns `Ok(Some(chain))` on success, `Ok(None)` if both search frontiers
/// drained without meeting, or `Err(LackingReagent)` if the registry can't
/// possibly connect the two substances regardless of tags or bans.
#[instrument(skip(reagents, barred), fields(reagents = reagents.len(), barred = barred.len()))]
pub fn search(
    reagents: &ReagentTable,
    src_cat: Substance,
    src_tags: &TagState,
    dst_cat: Substance,
    dst_tags: &TagState,
    barred: &HashSet<ReagentId>,
) -> Result<Option<Vec<ReagentId>>, LackingReagent> {
    let mut seq: u64 = 0;

    // --- Seed the forward frontier -----------------------------------
    // Seeds are NOT filtered by `barred` here (only at pop time), matching
    // the original: a registry whose only viable starting reagent has since
    // been banned is a NoChain, not a LackingReagent.
    let forward_starts = reagents.reagents_from(src_cat);
    let mut in_queue: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut any_satisfiable_start = false;
    for &id in forward_starts {
        let reagent = reagents.get(id);
        if !reagent.satisfied_by(src_tags) {
            continue;
        }
        any_satisfiable_start = true;
        let state_after: TagState = src_tags
            .difference(&reagent.req_in)
            .cloned()
            .chain(reagent.prov_out.iter().cloned())
            .collect();
        let priority = reagent.cost / (reagent.req_in.len() + 1) as f64;
        in_queue.push(QueueEntry {
            priority,
            seq: next_seq(&mut seq),
            node: Rc::new(SearchNode {
                reagent: id,
                parent: None,
                cost: reagent.cost,
                state_after,
            }),
        });
    }
    if forward_starts.is_empty() || !any_satisfiable_start {
        return Err(LackingReagent);
    }

    // --- Seed the backward frontier ------------------------------------
    let backward_ends = reagents.reagents_to(dst_cat);
    if backward_ends.is_empty() {
        return Err(LackingReagent);
    }
    let mut out_queue: BinaryHeap<QueueEntry> = BinaryHeap::new();
    for &id in backward_ends {
        let reagent = reagents.get(id);
        let state_after: TagState = dst_tags
            .difference(&reagent.prov_out)
            .cloned()
            .chain(reagent.req_in.iter().cloned())
            .collect();
        let matched = dst_tags.intersection(&reagent.prov_out).count();
        let priority = reagent.cost / (matched + 1) as f64;
        out_queue.push(QueueEntry {
            priority,
            seq: next_seq(&mut seq),
            node: Rc::new(SearchNode {
                reagent: id,
                parent: None,
                cost: reagent.cost,
                state_after,
            }),
        });
    }

    let mut in_visited: VisitedTable = HashMap::new();
    let mut out_visited: VisitedTable = HashMap::new();

    while !in_queue.is_empty() || !out_queue.is_empty() {
        let advance_forward = (!in_queue.is_empty() && in_queue.len() < out_queue.len()) || out_queue.is_empty();

        if advance_forward {
            let entry = in_queue.pop().expect("checked non-empty");
            let node = entry.node;
            if barred.contains(&node.reagent) {
                continue;
            }
            trace!(reagent = node.reagent.index(), cost = node.cost, "forward pop");

            let reagent = reagents.get(node.reagent);
            if reagent.cat_out == dst_cat && dst_tags.is_subset(&node.state_after) {
                return Ok(Some(reconstruct_forward(&node)));
            }

            if let Some(chain) = meet_forward(&node, &out_visited, src_tags) {
                return Ok(Some(chain));
            }

            let key = Some(node.parent_state(src_tags));
            let slot = in_visited.entry(node.reagent).or_default();
            if slot_contains(slot, &key) {
                continue;
            }
            slot.push((key, Rc::clone(&node)));

            for &next_id in reagents.reagents_from(reagent.cat_out) {
                relax_forward(reagents, &node, next_id, &in_visited, &mut in_queue, &mut seq);
            }
        } else {
            let entry = out_queue.pop().expect("checked non-empty");
            let node = entry.node;
            if barred.contains(&node.reagent) {
                continue;
            }
            trace!(reagent = node.reagent.index(), cost = node.cost, "backward pop");

            let reagent = reagents.get(node.reagent);
            if reagent.cat_in == src_cat && node.state_after.is_subset(src_tags) {
                return Ok(Some(reconstruct_backward(&node)));
            }

            if let Some(chain) = meet_backward(&node, &in_visited, src_tags) {
                return Ok(Some(chain));
            }

            let key = Some(node.parent_state(src_tags));
            let slot = out_visited.entry(node.reagent).or_default();
            if slot_contains(slot, &key) {
                continue;
            }
            slot.push((key, Rc::clone(&node)));

            for &next_id in reagents.reagents_to(reagent.cat_in) {
                relax_backward(reagents, &node, next_id, &out_visited, &mut out_queue, &mut seq);
            }
        }
    }

    Ok(None)
}

fn next_seq(seq: &mut u64) -> u64 {
    let value = *seq;
    *seq += 1;
    value
}

/// Extend the forward frontier across `next_id`, the way the original
/// extends `in_queue` from `self._input_map[node.transmuter.hash_out]`.
///
/// The pushed node's `state_after` is `node.state_after \ next.req_in` —
/// consumed tags only, `next.prov_out` is **not** folded in here. This is a
/// faithfully preserved quirk from the original: a locally-computed variant
/// that *does* add `prov_out` exists in the source but is discarded, and
/// downstream goal/meet checks only ever see the narrower state. Scenario 3
/// in the integration tests depends on this — it has to re-observe a
/// just-provided tag through the *parent* chain via an extra hop, rather
/// than seeing it appear directly in the providing node's own `state_after`.
fn relax_forward(
    reagents: &ReagentTable,
    node: &Rc<SearchNode>,
    next_id: ReagentId,
    in_visited: &VisitedTable,
    in_queue: &mut BinaryHeap<QueueEntry>,
    seq: &mut u64,
) {
    if in_visited
        .get(&next_id)
        .is_some_and(|slot| slot_contains(slot, &Some(node.state_after.clone())))
    {
        return;
    }
    let next = reagents.get(next_id);
    if !next.req_in.is_subset(&node.state_after) {
        return;
    }
    let state_after: TagState = node.state_after.difference(&next.req_in).cloned().collect();
    let cost = node.cost + next.cost;
    let priority = node.cost + next.cost / (next.req_in.len() + 1) as f64;
    in_queue.push(QueueEntry {
        priority,
        seq: next_seq(seq),
        node: Rc::new(SearchNode {
            reagent: next_id,
            parent: Some(Rc::clone(node)),
            cost,
            state_after,
        }),
    });
}

/// Extend the backward frontier across `next_id`. Unlike the forward case,
/// both the consumed and contributed tags are folded into `state_after`
/// here, matching the original's `out_queue` relaxation exactly.
fn relax_backward(
    reagents: &ReagentTable,
    node: &Rc<SearchNode>,
    next_id: ReagentId,
    out_visited: &VisitedTable,
    out_queue: &mut BinaryHeap<QueueEntry>,
    seq: &mut u64,
) {
    if out_visited
        .get(&next_id)
        .is_some_and(|slot| slot_contains(slot, &Some(node.state_after.clone())))
    {
        return;
    }
    let next = reagents.get(next_id);
    if !next.prov_out.is_subset(&node.state_after) {
        return;
    }
    let state_after: TagState = node
        .state_after
        .difference(&next.prov_out)
        .cloned()
        .chain(next.req_in.iter().cloned())
        .collect();
    let matched = next.prov_out.intersection(&node.state_after).count();
    let cost = node.cost + next.cost;
    let priority = node.cost + next.cost / (matched + 1) as f64;
    out_queue.push(QueueEntry {
        priority,
        seq: next_seq(seq),
        node: Rc::new(SearchNode {
            reagent: next_id,
            parent: Some(Rc::clone(node)),
            cost,
            state_after,
        }),
    });
}

/// Check whether the forward node `node` (sitting on some reagent `e`) meets
/// a backward-visited node on that same reagent, i.e. the backward side's
/// outstanding obligation at `e` is already satisfied by what the forward
/// side has supplied just before `e`.
fn meet_forward(node: &Rc<SearchNode>, out_visited: &VisitedTable, src_tags: &TagState) -> Option<Vec<ReagentId>> {
    let candidates = out_visited.get(&node.reagent)?;
    let supply = node.parent_state(src_tags);
    for (_, out_node) in candidates {
        if out_node.state_after.is_subset(&supply) {
            let mut forward_chain = reconstruct_forward(node);
            forward_chain.pop(); // drop the duplicated meeting reagent
            let backward_chain = reconstruct_backward(out_node);
            forward_chain.extend(backward_chain);
            return Some(forward_chain);
        }
    }
    None
}

/// Symmetric to [`meet_forward`]: a backward node meets a forward-visited
/// node on the same reagent when the backward obligation is already covered
/// by what the forward side supplied.
fn meet_backward(node: &Rc<SearchNode>, in_visited: &VisitedTable, src_tags: &TagState) -> Option<Vec<ReagentId>> {
    let candidates = in_visited.get(&node.reagent)?;
    for (_, in_node) in candidates {
        let supply = in_node.parent_state(src_tags);
        if node.state_after.is_subset(&supply) {
            let mut forward_chain = reconstruct_forward(in_node);
            forward_chain.pop(); // drop the duplicated meeting reagent
            let backward_chain = reconstruct_backward(node);
            forward_chain.extend(backward_chain);
            return Some(forward_chain);
        }
    }
    None
}

/// Walk a forward node's parent chain back to the root and reverse it, so
/// the result reads root (first reagent fired) to `node` (last reagent
/// fired) — forward nodes accumulate with the most recent reagent as `self`
/// and the earliest as the root.
fn reconstruct_forward(node: &Rc<SearchNode>) -> Vec<ReagentId> {
    let mut chain = Vec::new();
    let mut current = Some(Rc::clone(node));
    while let Some(n) = current {
        chain.push(n.reagent);
        current = n.parent.clone();
    }
    chain.reverse();
    chain
}

/// Walk a backward node's parent chain without reversing: backward nodes
/// accumulate with the *first* reagent to fire as `self` and later reagents
/// as ancestors, since the backward search grows from the destination
/// outward toward the source.
fn reconstruct_backward(node: &Rc<SearchNode>) -> Vec<ReagentId> {
    let mut chain = Vec::new();
    let mut current = Some(Rc::clone(node));
    while let Some(n) = current {
        chain.push(n.reagent);
        current = n.parent.clone();
    }
    chain
}
