//! Encode command - build one feature from command-line geometry.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use geofeature::config::UPPER_LEVEL;
use geofeature::container::FeatureWriter;
use geofeature::feature::{FeatureBuilder, FeatureEncoder};
use geofeature::geometry::{PointD, Triangle};
use tracing::{info, warn};

use super::common::{parse_point, parse_triangle};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the encode command.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Taxonomy outline file (defaults to [taxonomy] path in config.ini)
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Dotted type path, e.g. natural.coastline (repeatable)
    #[arg(long = "type", value_name = "PATH")]
    pub types: Vec<String>,

    /// Boundary point in projected coordinates (repeatable, in order)
    #[arg(long = "point", value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
    pub points: Vec<PointD>,

    /// Fill triangle (repeatable)
    #[arg(long = "triangle", value_name = "X,Y;X,Y;X,Y", value_parser = parse_triangle, allow_hyphen_values = true)]
    pub triangles: Vec<Triangle>,

    /// Drawing layer (-11 to 11)
    #[arg(long, allow_hyphen_values = true)]
    pub layer: Option<i32>,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Append the encoded record to this feature file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Level to print the geometry at
    #[arg(long, default_value_t = UPPER_LEVEL)]
    pub level: u8,
}

/// Run the encode command.
pub fn run(args: EncodeArgs, runner: &CliRunner) -> Result<(), CliError> {
    let encoder = FeatureEncoder::new(runner.config().codec.clone())?;
    let mut builder = FeatureBuilder::new();

    if !args.types.is_empty() {
        let taxonomy = runner.load_taxonomy(args.taxonomy.as_deref())?;
        for path in &args.types {
            match taxonomy.type_code_for_path(path) {
                Some(code) => {
                    builder.add_type(code);
                }
                None => {
                    warn!(path = %path, "Unknown type path, skipping");
                    eprintln!("Warning: unknown type path '{}' skipped", path);
                }
            }
        }
    }

    for &point in &args.points {
        builder.add_point(point);
    }
    for triangle in &args.triangles {
        builder.add_triangle(triangle.a, triangle.b, triangle.c);
    }
    if let Some(layer) = args.layer {
        builder.add_layer(layer)?;
    }
    if let Some(name) = args.name {
        builder.add_name(name);
    }

    let feature = encoder.encode(builder);
    println!("{}", feature.debug_string(args.level));
    println!(
        "Encoded {} bytes ({} tiers, {} triangles)",
        feature.as_bytes().len(),
        feature.tier_count(),
        feature.triangle_count()
    );

    if let Some(path) = args.output {
        let write_error = |error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_error)?;
        let mut writer = FeatureWriter::new(BufWriter::new(file));
        writer.write(&feature).map_err(write_error)?;
        writer.finish().map_err(write_error)?;

        info!(path = %path.display(), "Appended feature");
        println!("Appended to {}", path.display());
    }

    Ok(())
}
