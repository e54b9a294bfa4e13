//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::codec::{validate_tier_levels, ConfigError};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the
/// INI. Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [codec] section
    if let Some(section) = ini.section(Some("codec")) {
        if let Some(v) = section.get("coord_bits") {
            let bits: u8 = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "codec".to_string(),
                key: "coord_bits".to_string(),
                value: v.to_string(),
                reason: "must be an integer".to_string(),
            })?;
            config.codec = config.codec.with_coord_bits(bits);
            if let Err(e @ ConfigError::CoordBits(_)) = config.codec.validate() {
                return Err(ConfigFileError::InvalidValue {
                    section: "codec".to_string(),
                    key: "coord_bits".to_string(),
                    value: v.to_string(),
                    reason: e.to_string(),
                });
            }
        }
        if let Some(v) = section.get("tier_levels") {
            let invalid = |reason: String| ConfigFileError::InvalidValue {
                section: "codec".to_string(),
                key: "tier_levels".to_string(),
                value: v.to_string(),
                reason,
            };
            let levels = parse_level_list(v)
                .map_err(|_| invalid("expected a comma-separated list like '5,10,14,17'".to_string()))?;
            validate_tier_levels(&levels).map_err(|e| invalid(e.to_string()))?;
            config.codec = config.codec.with_tier_levels(levels);
        }
    }

    // [taxonomy] section
    if let Some(section) = ini.section(Some("taxonomy")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.taxonomy.path = Some(expand_tilde(v));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_level_list(value: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_parse_all_sections() {
        let config = load(
            r#"
[codec]
coord_bits = 24
tier_levels = 6, 12, 17

[taxonomy]
path = /data/classificator.txt

[logging]
directory = /var/log/geofeature
file = run.log
"#,
        )
        .unwrap();

        assert_eq!(config.codec.coord_bits(), 24);
        assert_eq!(config.codec.tier_levels(), &[6, 12, 17]);
        assert_eq!(
            config.taxonomy.path,
            Some(PathBuf::from("/data/classificator.txt"))
        );
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/geofeature"));
        assert_eq!(config.logging.file, "run.log");
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = load("[codec]\ncoord_bits = 20\n").unwrap();
        assert_eq!(config.codec.coord_bits(), 20);
        assert_eq!(config.codec.tier_levels(), DEFAULT_TIER_LEVELS);
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = load("[codec]\ncolour = blue\n[extra]\nkey = 1\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_invalid_coord_bits() {
        let err = load("[codec]\ncoord_bits = 64\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "coord_bits"
        ));
        assert!(err.to_string().contains("between 8 and 31"));

        let err = load("[codec]\ncoord_bits = many\n").unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_invalid_tier_levels() {
        for bad in ["10,5", "5,x", "", "5,5"] {
            let err = load(&format!("[codec]\ntier_levels = {bad}\n")).unwrap_err();
            assert!(
                matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "tier_levels"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/maps"), home.join("maps"));
        }
    }
}
