//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geofeature::config::{ConfigError, ConfigFileError};
use geofeature::container::ContainerError;
use geofeature::feature::FeatureError;
use geofeature::taxonomy::TaxonomyError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// The config file could not be loaded
    Config(ConfigFileError),
    /// The codec settings are invalid
    Codec(ConfigError),
    /// The taxonomy could not be loaded
    Taxonomy(TaxonomyError),
    /// No taxonomy given on the command line or in the config
    MissingTaxonomy,
    /// A command-line value could not be parsed
    InvalidArgument(String),
    /// Building the feature failed
    Feature(FeatureError),
    /// A feature file could not be read
    Container(ContainerError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingTaxonomy => {
                eprintln!();
                eprintln!("Pass --taxonomy <FILE>, or set it in config.ini:");
                eprintln!("  [taxonomy]");
                eprintln!("  path = /path/to/classificator.txt");
            }
            CliError::Taxonomy(TaxonomyError::Syntax { .. }) => {
                eprintln!();
                eprintln!("Taxonomy files list one type per line, nested by indentation:");
                eprintln!("  natural");
                eprintln!("    coastline @1");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Codec(e) => write!(f, "Invalid codec settings: {}", e),
            CliError::Taxonomy(e) => write!(f, "Failed to load taxonomy: {}", e),
            CliError::MissingTaxonomy => write!(f, "No taxonomy file configured"),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Feature(e) => write!(f, "Invalid feature: {}", e),
            CliError::Container(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Codec(e) => Some(e),
            CliError::Taxonomy(e) => Some(e),
            CliError::Feature(e) => Some(e),
            CliError::Container(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Codec(e)
    }
}

impl From<TaxonomyError> for CliError {
    fn from(e: TaxonomyError) -> Self {
        CliError::Taxonomy(e)
    }
}

impl From<FeatureError> for CliError {
    fn from(e: FeatureError) -> Self {
        CliError::Feature(e)
    }
}

impl From<ContainerError> for CliError {
    fn from(e: ContainerError) -> Self {
        CliError::Container(e)
    }
}
