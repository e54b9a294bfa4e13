//! Inspect command - dump the features stored in a feature file.

use std::path::PathBuf;

use clap::Args;
use geofeature::config::UPPER_LEVEL;
use geofeature::container::read_features;
use geofeature::taxonomy::Taxonomy;

use super::common::type_label;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the inspect command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Feature file to read
    pub file: PathBuf,

    /// Level to print the geometry at
    #[arg(long, default_value_t = UPPER_LEVEL)]
    pub level: u8,

    /// Taxonomy used to print readable type names
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,
}

/// Run the inspect command.
pub fn run(args: InspectArgs, runner: &CliRunner) -> Result<(), CliError> {
    let taxonomy: Option<Taxonomy> = match (&args.taxonomy, &runner.config().taxonomy.path) {
        (None, None) => None,
        (path, _) => Some(runner.load_taxonomy(path.as_deref())?),
    };

    let features = read_features(&args.file)?;
    println!("{}: {} features", args.file.display(), features.len());

    for (index, feature) in features.iter().enumerate() {
        let types: Vec<String> = feature
            .types()
            .iter()
            .map(|&code| type_label(code, taxonomy.as_ref()))
            .collect();

        println!();
        println!("#{} {}", index, feature.feature_type());
        println!("  Types:      {}", types.join(", "));
        println!("  Layer:      {}", feature.layer());
        println!("  Name:       {}", feature.name().unwrap_or("-"));
        println!("  Rect:       {}", feature.limit_rect());
        println!(
            "  Points:     {} at level {} ({} tiers)",
            feature.point_count(args.level),
            args.level,
            feature.tier_count()
        );
        println!("  Triangles:  {}", feature.triangle_count());
        if let Some(taxonomy) = &taxonomy {
            println!("  Visible:    {}", feature.is_visible_at(taxonomy, args.level));
        }
        println!("  {}", feature.debug_string(args.level));
    }

    Ok(())
}
