//! geofeature - compact vector map features
//!
//! This library turns map features (points, polylines and areas with type
//! tags, a drawing layer and a name) into small immutable binary records, and
//! decodes them back at any display level.
//!
//! - [`geometry`] - projected points, rectangles, quantization, simplification
//! - [`taxonomy`] - the feature type tree and packed [`TypeCode`](taxonomy::TypeCode)s
//! - [`feature`] - the mutable builder and the compiled codec
//! - [`container`] - files holding many compiled features
//! - [`config`] - codec settings and the INI config file
//!
//! # Example
//!
//! ```
//! use geofeature::feature::{CompiledFeature, FeatureBuilder};
//! use geofeature::geometry::PointD;
//! use geofeature::taxonomy::Taxonomy;
//!
//! let taxonomy: Taxonomy = "natural\n  coastline\n".parse()?;
//! let coastline = taxonomy.type_code_for_path("natural.coastline").unwrap();
//!
//! let mut builder = FeatureBuilder::new();
//! builder
//!     .add_point(PointD::new(0.0, 0.0))
//!     .add_point(PointD::new(3.0, 4.0))
//!     .add_type(coastline);
//!
//! let feature = CompiledFeature::encode(builder);
//! assert_eq!(feature.types(), &[coastline]);
//! assert_eq!(feature.points(10).count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod container;
pub mod feature;
pub mod geometry;
pub mod logging;
pub mod taxonomy;

/// Version of the geofeature library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
