//! Configuration for geofeature components.
//!
//! Two layers, mirroring how the codec is used:
//!
//! - [`CodecConfig`] is the in-process builder handed to the encoder
//! - [`ConfigFile`] is the user's `config.ini`, which carries a `CodecConfig`
//!   plus taxonomy and logging locations
//!
//! # Example
//!
//! ```
//! use geofeature::config::{CodecConfig, ConfigFile};
//!
//! let codec = CodecConfig::new().with_coord_bits(24);
//! assert!(codec.validate().is_ok());
//!
//! let file = ConfigFile::default();
//! assert_eq!(file.codec.coord_bits(), 30);
//! ```

mod codec;
mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use codec::{CodecConfig, ConfigError, MAX_LEVEL};
pub use defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_TIER_LEVELS, UPPER_LEVEL};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, TaxonomySettings};

pub(crate) use codec::{tier_index, validate_tier_levels};
