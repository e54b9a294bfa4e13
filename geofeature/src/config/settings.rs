//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use super::codec::CodecConfig;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Codec settings (`[codec]`)
    pub codec: CodecConfig,
    /// Taxonomy settings (`[taxonomy]`)
    pub taxonomy: TaxonomySettings,
    /// Logging settings (`[logging]`)
    pub logging: LoggingSettings,
}

/// Taxonomy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomySettings {
    /// Outline file describing the type tree
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory that holds the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
