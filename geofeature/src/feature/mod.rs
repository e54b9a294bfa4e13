//! Map features and their compact binary encoding.
//!
//! A feature is a geometry (boundary points and/or fill triangles) plus
//! attributes: type codes from the [taxonomy](crate::taxonomy), a drawing
//! layer and an optional name.
//!
//! - [`FeatureBuilder`] accumulates a feature
//! - [`FeatureEncoder`] quantizes and packs it, deriving simplified boundary
//!   tiers for coarser levels
//! - [`CompiledFeature`] is the immutable stored form, decoded lazily per
//!   level
//!
//! # Example
//!
//! ```
//! use geofeature::feature::{CompiledFeature, FeatureBuilder, GeometryKind};
//! use geofeature::geometry::PointD;
//!
//! let mut builder = FeatureBuilder::new();
//! for (x, y) in [(1.0, 1.0), (0.25, 0.5), (0.25, 0.2), (1.0, 1.0)] {
//!     builder.add_point(PointD::new(x, y));
//! }
//! builder.add_layer(3)?.add_name("pond");
//!
//! let feature = CompiledFeature::encode(builder);
//! assert_eq!(feature.feature_type(), GeometryKind::Area);
//!
//! let rebuilt = feature.to_builder();
//! assert_eq!(CompiledFeature::encode(rebuilt), feature);
//! # Ok::<(), geofeature::feature::FeatureError>(())
//! ```

mod builder;
mod codec;
mod compiled;
mod types;
mod wire;

pub use builder::FeatureBuilder;
pub use codec::FeatureEncoder;
pub use compiled::CompiledFeature;
pub use types::{FeatureError, GeometryKind, LAYER_HIGH, LAYER_LOW};

pub(crate) use wire::{put_varint, WireReader};
