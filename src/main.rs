//! transmute-demo: a thin binary exercising the `transmute` library end to
//! end. Not a product surface — it exists so the planner/executor can be
//! driven from a terminal without writing a Rust program first.

#![allow(dead_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use transmute::value::unwrap;
use transmute::{Lab, ReagentFailure, Substance, TransmuteRequest};

/// Build the registry used by every subcommand below.
///
/// Reproduces the "linear choice" scenario from the crate's test suite: two
/// routes from `A` to `D`, one direct and cheaper, one longer through `E`,
/// `F`, `G`. Reagent functions just append their own name to a `String`, the
/// same convention the upstream Python implementation's test fixtures use,
/// so the resulting chain is readable straight off stdout.
fn demo_lab() -> Lab {
    let mut lab = Lab::new();
    let (a, b, c, d, e, f, g) = (
        Substance::of("A"),
        Substance::of("B"),
        Substance::of("C"),
        Substance::of("D"),
        Substance::of("E"),
        Substance::of("F"),
        Substance::of("G"),
    );

    let edges = [
        (1.0, a, b, "AtoB"),
        (1.0, a, e, "AtoE"),
        (1.0, b, c, "BtoC"),
        (1.0, c, d, "CtoD"),
        (1.0, e, f, "EtoF"),
        (1.0, f, g, "FtoG"),
        (1.0, g, d, "GtoD"),
    ];
    for (cost, cat_in, cat_out, label) in edges {
        lab.stock_reagent(
            cost,
            cat_in,
            Default::default(),
            cat_out,
            Default::default(),
            append_label(label),
        );
    }
    lab
}

/// A reagent function that appends `" -> <label>"` to a `String` value,
/// failing with a `TypeError`-kind [`ReagentFailure`] if the upstream chain
/// handed it something else.
fn append_label(label: &'static str) -> transmute::reagent::ReagentFn {
    Box::new(move |value| {
        let s = unwrap::<String>(value).map_err(|_| ReagentFailure::new("TypeError", "expected a String"))?;
        Ok(transmute::value::wrap(format!("{s} -> {label}")))
    })
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "transmute-demo", about = "Demonstration binary for the transmute crate")]
struct Cli {
    /// Print the demo registry as Graphviz DOT instead of running it.
    #[arg(long)]
    dot: bool,

    /// The input string to feed into the demo chain.
    #[arg(long, default_value = "start")]
    value: String,

    /// Output format for the transmutation result.
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let lab = demo_lab();

    if cli.dot {
        println!("{}", lab.export_dot());
        return Ok(());
    }

    let d = Substance::of("D");
    let a = Substance::of("A");
    let request = TransmuteRequest::new(d).src_cat(a);

    info!(value = %cli.value, "running demo transmutation A -> D");
    match lab.transmute(cli.value, request) {
        Ok(result) => {
            let result =
                unwrap::<String>(result).map_err(|_| anyhow::anyhow!("demo chain did not return a String"))?;
            match cli.format {
                OutputFormat::Human => println!("{result}"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "result": result })),
            }
            Ok(())
        }
        Err(err) => match cli.format {
            OutputFormat::Human => Err(err).context("demo transmutation failed"),
            OutputFormat::Json => {
                let attempts = err.attempts().to_vec();
                println!("{}", serde_json::json!({ "error": err.to_string(), "attempts": attempts }));
                Err(err).context("demo transmutation failed")
            }
        },
    }
}
