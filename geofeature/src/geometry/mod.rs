//! Planar geometry primitives and coordinate quantization.
//!
//! Features live in the projected Mercator plane, where both axes span
//! `[-180, 180]`. Nothing is ever stored with raw `f64` coordinates: the
//! [`Quantizer`] maps points onto a fixed integer grid and back with a
//! bounded error ([`Quantizer::epsilon`]).
//!
//! # Example
//!
//! ```
//! use geofeature::geometry::{PointD, Quantizer};
//!
//! let quantizer = Quantizer::default();
//! let p = PointD::new(0.25, 0.2);
//! let back = quantizer.dequantize(quantizer.quantize(p));
//!
//! assert!((back.x - p.x).abs() <= quantizer.epsilon());
//! assert!((back.y - p.y).abs() <= quantizer.epsilon());
//! ```

pub mod mercator;
mod point;
mod quantizer;
mod rect;
mod simplify;

pub use point::{PointD, Triangle};
pub use quantizer::{
    QuantizedPoint, Quantizer, DEFAULT_COORD_BITS, MAX_COORD_BITS, MIN_COORD_BITS, POINT_EPSILON,
};
pub use rect::RectD;
pub use simplify::{simplify_line, simplify_ring};
