//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let tier_levels = config
        .codec
        .tier_levels()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let taxonomy_path = config
        .taxonomy
        .path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[codec]
; Bits per axis of the coordinate grid (8-31, default: 30)
coord_bits = {}
; Upper level of each geometry tier, coarse to fine (default: 5,10,14,17)
; The last tier always stores the full boundary
tier_levels = {}

[taxonomy]
; Outline file with the feature type tree
path = {}

[logging]
; Directory for the log file (default: logs)
directory = {}
; Log file name (default: geofeature.log)
file = {}
"#,
        config.codec.coord_bits(),
        tier_levels,
        taxonomy_path,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
