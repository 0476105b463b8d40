use clap::{Parser, Subcommand};
use hn_core::Real;
use hn_graph::{ElementKind, Network, diagnose};
use hn_project::ProjectError;
use hn_sim::{FlowLog, FlowObserver, OutFlow, SimOptions, run};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hydronet")]
#[command(about = "Hydronet CLI - hydraulic network flow simulation", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network description file
    Validate {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Print the network as an indented tree
    Layout {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Report structural problems (shared inputs, open outputs, ...)
    Check {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
    },
    /// Propagate source flows through the network
    Simulate {
        /// Path to the network YAML/JSON file
        network_path: PathBuf,
        /// Report elements whose input exceeds their maximum flow
        #[arg(long)]
        check_max_flow: bool,
        /// Delete an element by name before simulating (repeatable)
        #[arg(long = "delete", value_name = "NAME")]
        delete: Vec<String>,
        /// Print notifications as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Cannot delete '{name}': no such element")]
    DeleteMissing { name: String },

    #[error("Cannot delete '{name}': it feeds more than one branch")]
    DeleteRefused { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Layout { network_path } => cmd_layout(&network_path),
        Commands::Check { network_path } => cmd_check(&network_path),
        Commands::Simulate {
            network_path,
            check_max_flow,
            delete,
            json,
        } => cmd_simulate(&network_path, check_max_flow, &delete, json),
    }
}

fn load_network(network_path: &Path) -> CliResult<Network> {
    let def = hn_project::load(network_path)?;
    tracing::debug!(name = %def.name, elements = def.elements.len(), "description loaded");
    Ok(hn_project::to_network(&def)?)
}

fn cmd_validate(network_path: &Path) -> CliResult<()> {
    println!("Validating network: {}", network_path.display());
    let network = load_network(network_path)?;
    println!(
        "✓ Network is valid ({} elements, {} sources)",
        network.len(),
        network.sources().count()
    );
    Ok(())
}

fn cmd_layout(network_path: &Path) -> CliResult<()> {
    let network = load_network(network_path)?;
    println!("{}", network.layout());
    Ok(())
}

fn cmd_check(network_path: &Path) -> CliResult<()> {
    let network = load_network(network_path)?;
    let diagnostics = diagnose(&network);
    if diagnostics.is_empty() {
        println!("✓ No problems found");
    } else {
        println!("{} problem(s) found:", diagnostics.len());
        for d in &diagnostics {
            println!("  {}", d);
        }
    }
    Ok(())
}

fn cmd_simulate(
    network_path: &Path,
    check_max_flow: bool,
    delete: &[String],
    json: bool,
) -> CliResult<()> {
    let mut network = load_network(network_path)?;
    for name in delete {
        delete_element(&mut network, name)?;
    }

    let opts = SimOptions { check_max_flow };
    if json {
        let mut log = FlowLog::new();
        let report = run(&network, &opts, &mut log);
        tracing::info!(?report, "simulation finished");
        println!("{}", serde_json::to_string_pretty(&log.into_events())?);
        return Ok(());
    }

    let report = run(&network, &opts, &mut PrintObserver);
    println!(
        "Visited {} element(s) from {} source(s)",
        report.visited, report.sources
    );
    if check_max_flow {
        if report.violations == 0 {
            println!("✓ No element exceeds its maximum flow");
        } else {
            println!("✗ {} element(s) exceed their maximum flow", report.violations);
        }
    }
    Ok(())
}

fn delete_element(network: &mut Network, name: &str) -> CliResult<()> {
    if network.find(name).is_none() {
        return Err(CliError::DeleteMissing {
            name: name.to_string(),
        });
    }
    if !network.delete(name) {
        return Err(CliError::DeleteRefused {
            name: name.to_string(),
        });
    }
    tracing::debug!(name, "deleted before simulation");
    Ok(())
}

fn format_out_flow(out_flow: &OutFlow) -> String {
    match out_flow {
        OutFlow::None => "-".to_string(),
        OutFlow::Single(v) => format!("{:.3}", v),
        OutFlow::Split(vs) => {
            let parts: Vec<String> = vs.iter().map(|v| format!("{:.3}", v)).collect();
            format!(
                "{} (total {:.3})",
                parts.join(" / "),
                out_flow.total().unwrap_or_default()
            )
        }
    }
}

/// Prints one line per notification to stdout.
struct PrintObserver;

impl FlowObserver for PrintObserver {
    fn notify_flow(
        &mut self,
        kind: ElementKind,
        name: &str,
        in_flow: Option<Real>,
        out_flow: &OutFlow,
    ) {
        let input = match in_flow {
            Some(v) => format!("{:.3}", v),
            None => "-".to_string(),
        };
        let output = format_out_flow(out_flow);
        println!(
            "  {:<10} {:<16} in {:>10}  out {}",
            kind.label(),
            name,
            input,
            output
        );
    }

    fn notify_flow_error(&mut self, kind: ElementKind, name: &str, in_flow: Real, max_flow: Real) {
        println!(
            "  ! {} {} receives {:.3}, above its maximum of {:.3}",
            kind, name, in_flow, max_flow
        );
    }
}
