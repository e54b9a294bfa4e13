//! Lookup command - resolve a type path against a taxonomy.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the lookup command.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Taxonomy outline file (defaults to [taxonomy] path in config.ini)
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Dotted type path, e.g. natural.coastline
    pub path: String,
}

/// Run the lookup command.
pub fn run(args: LookupArgs, runner: &CliRunner) -> Result<(), CliError> {
    let taxonomy = runner.load_taxonomy(args.taxonomy.as_deref())?;

    let node = taxonomy
        .find_path(&args.path)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown type path '{}'", args.path)))?;
    let code = node.type_code();
    let min_level = taxonomy.min_visible_level(code).unwrap_or(0);

    println!("{}", args.path);
    println!("  Node index:    {}", node.index());
    println!("  Indices:       {}", code);
    println!("  Type code:     {:#x}", code.raw());
    println!("  Visible from:  level {}", min_level);
    println!("  Children:      {}", node.child_count());
    Ok(())
}
