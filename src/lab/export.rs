//! Hand-rolled Graphviz DOT export of a [`super::Lab`]'s registry, in the
//! same direct `write!`/`writeln!` style the teacher repo's own CFG exporter
//! uses rather than pulling in a graph-drawing crate for a one-off format.

use std::fmt::Write as _;

use crate::reagent_table::ReagentTable;

/// Render every registered reagent as a labeled edge between its input and
/// output substances. Substances are labeled by their raw hash since no
/// human-readable name survives `Substance::of`.
pub fn export_dot(reagents: &ReagentTable) -> String {
    let mut out = String::new();
    writeln!(out, "digraph transmute {{").unwrap();
    writeln!(out, "    rankdir=LR;").unwrap();

    for reagent in reagents.iter() {
        writeln!(
            out,
            "    \"{:016x}\" -> \"{:016x}\" [label=\"#{} cost={}\"];",
            reagent.cat_in.raw(),
            reagent.cat_out.raw(),
            reagent.id.index(),
            reagent.cost,
        )
        .unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReagentFailure;
    use crate::substance::Substance;
    use crate::value::{unwrap, wrap};
    use crate::variation::TagState;

    #[test]
    fn renders_one_edge_per_reagent() {
        let mut table = ReagentTable::new();
        let a = Substance::of("A");
        let b = Substance::of("B");
        table.register(
            1.0,
            a,
            TagState::new(),
            b,
            TagState::new(),
            Box::new(|v| unwrap::<i32>(v).map(wrap).map_err(|_| ReagentFailure::new("TypeError", "expected i32"))),
        );

        let dot = export_dot(&table);
        assert!(dot.starts_with("digraph transmute {"));
        assert!(dot.contains("cost=1"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
