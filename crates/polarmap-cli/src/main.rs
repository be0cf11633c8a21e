//! Polarmap CLI - load, gate, and analyse polar measurement sets.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polarmap")]
#[command(author, version, about = "Loudspeaker polar measurement analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a measurement set and print what was found
    Inspect(commands::inspect::InspectArgs),

    /// Run the analysis pipeline and export the derived data
    Analyze(commands::analyze::AnalyzeArgs),

    /// Manage analysis session files
    Session(commands::session::SessionArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Session(args) => commands::session::run(args),
    }
}
