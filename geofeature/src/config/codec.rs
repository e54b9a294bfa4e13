//! Feature codec configuration.

use thiserror::Error;

use super::defaults::{DEFAULT_TIER_LEVELS, UPPER_LEVEL};
use crate::geometry::mercator::{MAX_X, MIN_X};
use crate::geometry::{DEFAULT_COORD_BITS, MAX_COORD_BITS, MIN_COORD_BITS};

/// Highest level a tier may be assigned to.
pub const MAX_LEVEL: u8 = 31;

/// Screen pixels per tile edge used to turn a level into a tolerance.
const TILE_PIXELS: f64 = 256.0;

/// Invalid codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Coordinate precision outside the supported range.
    #[error("coord_bits must be between {min} and {max}, got {0}", min = MIN_COORD_BITS, max = MAX_COORD_BITS)]
    CoordBits(u8),

    /// The tier table is empty, unsorted or out of range.
    #[error("Invalid tier levels {levels:?}: {reason}")]
    TierLevels { levels: Vec<u8>, reason: String },
}

/// Configuration for encoding features.
///
/// Controls the coordinate grid resolution and the level bands of the
/// simplified geometry tiers. The last tier always stores the full boundary.
///
/// # Example
///
/// ```
/// use geofeature::config::CodecConfig;
///
/// // Defaults: 30-bit grid, tiers for levels 5, 10, 14 and 17
/// let config = CodecConfig::default();
/// assert_eq!(config.coord_bits(), 30);
/// assert_eq!(config.tier_levels(), &[5, 10, 14, 17]);
///
/// // Custom configuration
/// let config = CodecConfig::new()
///     .with_coord_bits(24)
///     .with_tier_levels(vec![8, 17]);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tier_for_level(12), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Quantization grid resolution in bits per axis
    coord_bits: u8,
    /// Upper level of each geometry tier, coarse to fine
    tier_levels: Vec<u8>,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantization grid resolution.
    pub fn with_coord_bits(mut self, bits: u8) -> Self {
        self.coord_bits = bits;
        self
    }

    /// Set the tier upper levels (strictly increasing).
    pub fn with_tier_levels(mut self, levels: Vec<u8>) -> Self {
        self.tier_levels = levels;
        self
    }

    pub fn coord_bits(&self) -> u8 {
        self.coord_bits
    }

    pub fn tier_levels(&self) -> &[u8] {
        &self.tier_levels
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COORD_BITS..=MAX_COORD_BITS).contains(&self.coord_bits) {
            return Err(ConfigError::CoordBits(self.coord_bits));
        }
        validate_tier_levels(&self.tier_levels)
    }

    /// Index of the tier that serves `level`.
    ///
    /// The first tier whose upper level is at least `level`; levels past the
    /// finest tier clamp to it.
    pub fn tier_for_level(&self, level: u8) -> usize {
        tier_index(&self.tier_levels, level)
    }

    /// Simplification tolerance for a tier, in projected units.
    ///
    /// Roughly one pixel of a 256 px tile at `level`.
    pub fn tolerance_for_level(level: u8) -> f64 {
        let level = level.min(MAX_LEVEL);
        (MAX_X - MIN_X) / (1u64 << level) as f64 / TILE_PIXELS
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            coord_bits: DEFAULT_COORD_BITS,
            tier_levels: DEFAULT_TIER_LEVELS.to_vec(),
        }
    }
}

/// Shared clamping level → tier lookup over an ordered upper-level table.
pub(crate) fn tier_index(upper_levels: &[u8], level: u8) -> usize {
    upper_levels
        .iter()
        .position(|&upper| upper >= level)
        .unwrap_or(upper_levels.len().saturating_sub(1))
}

pub(crate) fn validate_tier_levels(levels: &[u8]) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::TierLevels {
        levels: levels.to_vec(),
        reason: reason.to_string(),
    };

    if levels.is_empty() {
        return Err(invalid("at least one tier is required"));
    }
    if levels.len() > usize::from(u8::MAX) {
        return Err(invalid("too many tiers"));
    }
    if levels.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("levels must be strictly increasing"));
    }
    if levels.iter().any(|&level| level > MAX_LEVEL) {
        return Err(invalid("levels must not exceed 31"));
    }
    Ok(())
}
