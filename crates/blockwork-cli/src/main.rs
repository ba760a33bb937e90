//! Blockwork CLI - render, plan and inspect block systems.

mod commands;
mod preset;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockwork")]
#[command(author, version, about = "Blockwork dataflow engine CLI", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the echo patch
    Process(commands::process::ProcessArgs),

    /// Print the evaluation order and feedback edges of a graph
    Plan(commands::plan::PlanArgs),

    /// Describe the echo patch topology
    Info(commands::info::InfoArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
