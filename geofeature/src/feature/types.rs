//! Feature geometry kinds, layer bounds and codec errors.

use std::fmt;

use thiserror::Error;

use crate::taxonomy::TypeCodeError;

/// Lowest drawing layer a feature may sit on.
pub const LAYER_LOW: i8 = -11;

/// Highest drawing layer a feature may sit on.
pub const LAYER_HIGH: i8 = 11;

/// Shape of a feature, derived from its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum GeometryKind {
    /// Zero or one boundary point and no triangles
    #[default]
    Point,
    /// Open polyline
    Line,
    /// Closed ring and/or fill triangles
    Area,
}

impl GeometryKind {
    /// Two-bit wire tag.
    pub(crate) fn tag(self) -> u8 {
        match self {
            GeometryKind::Point => 0,
            GeometryKind::Line => 1,
            GeometryKind::Area => 2,
        }
    }
}

impl TryFrom<u8> for GeometryKind {
    type Error = FeatureError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(GeometryKind::Point),
            1 => Ok(GeometryKind::Line),
            2 => Ok(GeometryKind::Area),
            other => Err(FeatureError::InvalidGeometryKind(other)),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "point"),
            GeometryKind::Line => write!(f, "line"),
            GeometryKind::Area => write!(f, "area"),
        }
    }
}

/// Errors from building features and from parsing feature records.
///
/// Encoding never fails; everything past [`LayerOutOfRange`] describes a
/// malformed byte buffer handed to
/// [`CompiledFeature::from_bytes`](super::CompiledFeature::from_bytes).
///
/// [`LayerOutOfRange`]: FeatureError::LayerOutOfRange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Layer outside `LAYER_LOW..=LAYER_HIGH`
    #[error("Layer {0} is outside {low}..={high}", low = LAYER_LOW, high = LAYER_HIGH)]
    LayerOutOfRange(i32),

    /// The record ends in the middle of a field
    #[error("Unexpected end of record at byte {offset}")]
    UnexpectedEof { offset: usize },

    /// A varint runs past 64 bits
    #[error("Varint overflow at byte {offset}")]
    VarintOverflow { offset: usize },

    /// Reserved header bits are set
    #[error("Invalid header byte {0:#04x}")]
    InvalidHeader(u8),

    /// Unknown geometry kind tag
    #[error("Unknown geometry kind {0}")]
    InvalidGeometryKind(u8),

    /// Grid resolution outside the supported range
    #[error("Unsupported coordinate precision of {0} bits")]
    UnsupportedCoordBits(u8),

    /// A packed type code is malformed
    #[error("Invalid type code: {0}")]
    InvalidTypeCode(#[from] TypeCodeError),

    /// The name is not valid UTF-8
    #[error("Feature name is not valid UTF-8: {0}")]
    InvalidName(#[from] std::str::Utf8Error),

    /// Limit rectangle corners are inverted or off the grid
    #[error("Invalid limit rectangle")]
    InvalidRect,

    /// A point feature claims more than one point
    #[error("Point feature has {0} points")]
    InvalidPointCount(u64),

    /// Tier levels are unordered or out of range
    #[error("Invalid tier table: {0}")]
    InvalidTierTable(String),

    /// The finest tier defers to a finer tier that does not exist
    #[error("Tier {tier} refers to a finer tier that does not exist")]
    DanglingTierReference { tier: usize },

    /// A coordinate falls outside the grid
    #[error("Coordinate out of grid range at byte {offset}")]
    CoordinateOutOfRange { offset: usize },

    /// Bytes left over after the last field
    #[error("{0} trailing bytes after feature record")]
    TrailingBytes(usize),
}
