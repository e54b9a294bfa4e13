//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization and taxonomy loading
//! to reduce duplication across command handlers.

use std::path::Path;

use geofeature::config::ConfigFile;
use geofeature::logging::{init_logging, LoggingGuard};
use geofeature::taxonomy::Taxonomy;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config (default location unless `config_path` is given) and
    /// initialize logging from its `[logging]` section.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("geofeature v{}", geofeature::VERSION);
        info!("geofeature CLI: {} command", command);
    }

    /// Load the taxonomy named on the command line, falling back to the
    /// config file.
    pub fn load_taxonomy(&self, path: Option<&Path>) -> Result<Taxonomy, CliError> {
        let path = path
            .or(self.config.taxonomy.path.as_deref())
            .ok_or(CliError::MissingTaxonomy)?;
        Ok(Taxonomy::load(path)?)
    }
}
