//! Default values for every configuration setting.
//!
//! Holds the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::codec::CodecConfig;
use super::settings::*;

// =============================================================================
// Codec
// =============================================================================

/// Upper level of each geometry tier, coarse to fine.
pub const DEFAULT_TIER_LEVELS: [u8; 4] = [5, 10, 14, 17];

/// The finest level of the default tier table, where full geometry is served.
pub const UPPER_LEVEL: u8 = 17;

// =============================================================================
// Logging
// =============================================================================

/// Directory for log files, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log file name inside [`DEFAULT_LOG_DIR`].
pub const DEFAULT_LOG_FILE: &str = "geofeature.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            taxonomy: TaxonomySettings { path: None },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_level_is_last_tier() {
        assert_eq!(DEFAULT_TIER_LEVELS.last(), Some(&UPPER_LEVEL));
    }

    #[test]
    fn test_default_config_file() {
        let config = ConfigFile::default();
        assert_eq!(config.codec, CodecConfig::default());
        assert!(config.taxonomy.path.is_none());
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.file, "geofeature.log");
    }
}
