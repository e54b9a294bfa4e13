//! Fixed-precision coordinate quantization.
//!
//! Both Mercator axes are mapped onto `2^bits - 1` equal steps, so every
//! grid coordinate fits in a `u32`. Rounding to the nearest grid line keeps the
//! round-trip error below half a step; [`Quantizer::epsilon`] publishes a full
//! step as the bound callers may rely on.

use super::mercator::{MAX_X, MAX_Y, MIN_X, MIN_Y};
use super::PointD;

/// Grid resolution used when no configuration says otherwise.
pub const DEFAULT_COORD_BITS: u8 = 30;

/// Smallest supported grid resolution.
pub const MIN_COORD_BITS: u8 = 8;

/// Largest supported grid resolution (grid values must fit in `u32`).
pub const MAX_COORD_BITS: u8 = 31;

/// Round-trip epsilon of the default 30-bit grid: `360 / (2^30 - 1)`.
pub const POINT_EPSILON: f64 = 360.0 / 1_073_741_823.0;

/// A point snapped to the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QuantizedPoint {
    pub x: u32,
    pub y: u32,
}

impl QuantizedPoint {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Maps projected coordinates to and from the integer grid.
///
/// The quantizer is a plain value: it holds the grid resolution and nothing
/// else, and every method is pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    bits: u8,
}

impl Quantizer {
    /// Create a quantizer with `bits` of precision per axis.
    ///
    /// `bits` is clamped into `MIN_COORD_BITS..=MAX_COORD_BITS`; configuration
    /// validation rejects out-of-range values before they get here.
    pub fn new(bits: u8) -> Self {
        Self {
            bits: bits.clamp(MIN_COORD_BITS, MAX_COORD_BITS),
        }
    }

    /// Grid resolution in bits per axis.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Largest grid coordinate.
    #[inline]
    pub fn max_value(&self) -> u32 {
        ((1u64 << self.bits) - 1) as u32
    }

    #[inline]
    fn step_x(&self) -> f64 {
        (MAX_X - MIN_X) / self.max_value() as f64
    }

    #[inline]
    fn step_y(&self) -> f64 {
        (MAX_Y - MIN_Y) / self.max_value() as f64
    }

    /// Maximum componentwise error of `dequantize(quantize(p))`.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.step_x().max(self.step_y())
    }

    /// Snap a point to the grid.
    ///
    /// Coordinates outside the Mercator bounds are a caller error; they are
    /// clamped to the border of the grid.
    #[inline]
    pub fn quantize(&self, p: PointD) -> QuantizedPoint {
        QuantizedPoint {
            x: self.quantize_axis(p.x, MIN_X, self.step_x()),
            y: self.quantize_axis(p.y, MIN_Y, self.step_y()),
        }
    }

    /// Convert a grid point back to projected coordinates.
    #[inline]
    pub fn dequantize(&self, q: QuantizedPoint) -> PointD {
        PointD {
            x: MIN_X + q.x as f64 * self.step_x(),
            y: MIN_Y + q.y as f64 * self.step_y(),
        }
    }

    /// Snap `p` to the grid and return the grid point's coordinates.
    #[inline]
    pub fn snap(&self, p: PointD) -> PointD {
        self.dequantize(self.quantize(p))
    }

    #[inline]
    fn quantize_axis(&self, v: f64, min: f64, step: f64) -> u32 {
        let cell = ((v - min) / step).round();
        cell.clamp(0.0, self.max_value() as f64) as u32
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(DEFAULT_COORD_BITS)
    }
}
