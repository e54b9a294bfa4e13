//! geofeature CLI - Command-line interface
//!
//! Looks up feature types, encodes features and inspects feature files.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::encode::EncodeArgs;
use commands::inspect::InspectArgs;
use commands::lookup::LookupArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "geofeature")]
#[command(version = geofeature::VERSION)]
#[command(about = "Encode and inspect compact vector map features", long_about = None)]
struct Cli {
    /// Config file (default: ~/.geofeature/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dotted type path to its node indices and type code
    Lookup(LookupArgs),
    /// Build and encode one feature
    Encode(EncodeArgs),
    /// Print every feature stored in a feature file
    Inspect(InspectArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref())?;

    match cli.command {
        Commands::Lookup(args) => {
            runner.log_startup("lookup");
            commands::lookup::run(args, &runner)
        }
        Commands::Encode(args) => {
            runner.log_startup("encode");
            commands::encode::run(args, &runner)
        }
        Commands::Inspect(args) => {
            runner.log_startup("inspect");
            commands::inspect::run(args, &runner)
        }
    }
}
