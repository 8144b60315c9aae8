//! `workflow-sim` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate`   : run the structural checks on a workflow JSON file.
//! - `inspect`    : print entry points, reachability and a traversal order.
//! - `simulate`   : validate, simulate and stream the log at a fixed pace.
//! - `automations`: list the automations process nodes can reference.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use automations::{AutomationLookup, MockCatalog};
use engine::{Graph, Node, SimulationEvent, SimulationStatus};
use player::{Player, PlayerConfig, TestOutcome, TestSession};

#[derive(Parser)]
#[command(
    name = "workflow-sim",
    about = "Validate and dry-run workflow graphs exported by the editor",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Show the structure of a workflow: entry nodes, reachability, order.
    Inspect {
        path: PathBuf,
    },
    /// Validate, simulate and stream the simulation log.
    Simulate {
        path: PathBuf,
        /// Delay between streamed log entries.
        #[arg(long, env = "WORKFLOW_PLAYBACK_INTERVAL_MS", default_value_t = 600)]
        interval_ms: u64,
        /// Print the full result as JSON instead of streaming it.
        #[arg(long)]
        json: bool,
    },
    /// List the built-in automation catalog.
    Automations,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so streamed output stays clean on stdout.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let graph = load_graph(&path)?;
            let report = engine::validate(&graph);

            if report.is_clean() {
                println!("✅ Workflow is valid ({} nodes, {} edges).", graph.node_count(), graph.edge_count());
            } else {
                eprintln!("❌ Validation failed:");
                for message in report.messages() {
                    eprintln!("  - {message}");
                }
                std::process::exit(1);
            }
        }
        Command::Inspect { path } => {
            let graph = load_graph(&path)?;
            print_structure(&graph);
        }
        Command::Simulate { path, interval_ms, json } => {
            let graph = load_graph(&path)?;
            if json {
                simulate_json(&graph)?;
            } else {
                simulate_streaming(&graph, PlayerConfig::with_interval_millis(interval_ms)).await?;
            }
        }
        Command::Automations => {
            let catalog = MockCatalog::builtin();
            for automation in catalog.list().await? {
                println!(
                    "{:<8} {:<20} [{}] {}",
                    automation.id, automation.name, automation.category, automation.description
                );
            }
        }
    }

    Ok(())
}

fn load_graph(path: &Path) -> anyhow::Result<Graph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let graph = Graph::from_json(&content)
        .with_context(|| format!("cannot load workflow from {}", path.display()))?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "workflow loaded");
    Ok(graph)
}

fn names(nodes: &[&Node]) -> String {
    nodes
        .iter()
        .map(|n| format!("{} ({})", n.id, n.display_label()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_structure(graph: &Graph) {
    println!("Nodes:       {}", graph.node_count());
    println!("Edges:       {}", graph.edge_count());
    println!("Entry nodes: {}", names(&graph.entry_nodes()));
    println!("Reachable:   {}", names(&graph.reachable_nodes()));
    println!("Unreachable: {}", names(&graph.unreachable_nodes()));
    match graph.traversal_order() {
        Ok(order) => println!("Order:       {}", order.join(" → ")),
        Err(e) => println!("Order:       unavailable ({e})"),
    }
}

fn simulate_json(graph: &Graph) -> anyhow::Result<()> {
    let report = engine::validate(graph);
    if !report.is_clean() {
        println!("{}", serde_json::json!({ "success": false, "errors": report.messages() }));
        std::process::exit(1);
    }

    let result = engine::simulate(graph);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn simulate_streaming(graph: &Graph, config: PlayerConfig) -> anyhow::Result<()> {
    let mut session = TestSession::new(Player::new(config));

    let result = match session.run_test(graph, print_event) {
        TestOutcome::Blocked(report) => {
            eprintln!("Validation Errors:");
            for message in report.messages() {
                eprintln!("  - {message}");
            }
            std::process::exit(1);
        }
        TestOutcome::Streaming(result) => result,
    };

    for error in &result.errors {
        eprintln!("⚠ {error}");
    }

    session.wait().await?;

    println!(
        "Simulation complete: {} ({} events, computed in {} ms)",
        if result.success { "success" } else { "failed" },
        result.log.len(),
        result.duration_millis
    );
    Ok(())
}

fn print_event(event: SimulationEvent) {
    let marker = match event.status {
        SimulationStatus::Running => "…",
        SimulationStatus::Success => "✓",
        SimulationStatus::Error => "✗",
    };
    println!(
        "[{}] {marker} {:<16} {}",
        event.timestamp.format("%H:%M:%S"),
        event.node_name,
        event.message
    );
}
