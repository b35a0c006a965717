//! Weighted influence maximization over a GEXF graph.
//!
//! Parses the graph, runs CELF seed selection, and prints the selected
//! seeds with their marginal gains. Diagnostics go to stderr; the stdout
//! surface is stable and machine-readable.

use celf_im::celf::{select, SelectConfig};
use celf_im::gexf;
use std::process;
use std::time::Instant;

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <graph_file> <k> <value_attribute> [mc_rounds]",
        program
    );
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        usage(&args[0]);
    }

    let graph_file = &args[1];
    let k: usize = match args[2].parse() {
        Ok(k) => k,
        Err(_) => {
            eprintln!("Invalid k '{}': expected a non-negative integer", args[2]);
            usage(&args[0]);
        }
    };
    let value_attribute = &args[3];
    let mc_rounds: u32 = match args.get(4) {
        Some(raw) => match raw.parse() {
            Ok(rounds) if rounds >= 1 => rounds,
            _ => {
                eprintln!("Invalid mc_rounds '{}': expected a positive integer", raw);
                usage(&args[0]);
            }
        },
        None => 1000,
    };

    println!("Parsing GEXF...");
    let graph = match gexf::parse_file(graph_file, value_attribute) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    println!("Nodes: {}", graph.node_count());
    println!("Eligible candidates: {}", graph.eligible_count());
    println!(
        "Initializing CELF (calculating base weighted influence for {} candidates)...",
        graph.eligible_count()
    );

    let config = SelectConfig {
        k,
        mc_rounds,
        ..SelectConfig::default()
    };

    let start = Instant::now();
    let selection = select(&graph, &config);
    let elapsed = start.elapsed();

    for step in &selection.steps {
        println!(
            "Selected Node {} (Val: {}) | Marginal Gain: {} | Total Weighted Reach: {}",
            step.external_id, step.value, step.marginal_gain, step.total_reach
        );
    }

    println!("---------------------------------");
    let seed_ids: Vec<&str> = selection
        .seeds
        .iter()
        .map(|&s| graph.external_id(s))
        .collect();
    println!("Selected Seeds: {}", seed_ids.join(" "));
    println!("Time: {:.3}s", elapsed.as_secs_f64());
}
