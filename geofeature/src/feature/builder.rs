//! Mutable feature accumulation.

use crate::geometry::{PointD, RectD, Triangle};
use crate::taxonomy::TypeCode;

use super::types::{FeatureError, GeometryKind, LAYER_HIGH, LAYER_LOW};

/// Collects the geometry and attributes of one feature before encoding.
///
/// Every `add_*` call appends; nothing is reordered or deduplicated except
/// type codes, which keep their first occurrence. The builder is consumed by
/// [`FeatureEncoder::encode`](super::FeatureEncoder::encode).
///
/// # Example
///
/// ```
/// use geofeature::feature::{FeatureBuilder, GeometryKind};
/// use geofeature::geometry::PointD;
///
/// let mut builder = FeatureBuilder::new();
/// builder
///     .add_point(PointD::new(0.0, 0.0))
///     .add_point(PointD::new(1.0, 0.5));
/// builder.add_layer(2)?;
///
/// assert_eq!(builder.geometry_kind(), GeometryKind::Line);
/// # Ok::<(), geofeature::feature::FeatureError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureBuilder {
    points: Vec<PointD>,
    triangles: Vec<Triangle>,
    types: Vec<TypeCode>,
    layer: i8,
    name: Option<String>,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassemble a builder from already validated parts.
    pub(super) fn from_parts(
        points: Vec<PointD>,
        triangles: Vec<Triangle>,
        types: Vec<TypeCode>,
        layer: i8,
        name: Option<String>,
    ) -> Self {
        Self {
            points,
            triangles,
            types,
            layer,
            name,
        }
    }

    /// Take the attributes, leaving the geometry behind.
    pub(super) fn into_attributes(self) -> (Vec<TypeCode>, i8, Option<String>) {
        (self.types, self.layer, self.name)
    }

    /// Append a boundary point.
    pub fn add_point(&mut self, p: PointD) -> &mut Self {
        self.points.push(p);
        self
    }

    /// Append a fill triangle.
    pub fn add_triangle(&mut self, a: PointD, b: PointD, c: PointD) -> &mut Self {
        self.triangles.push(Triangle::new(a, b, c));
        self
    }

    /// Attach a type code. Empty codes and repeats are ignored.
    pub fn add_type(&mut self, code: TypeCode) -> &mut Self {
        if !code.is_empty() && !self.types.contains(&code) {
            self.types.push(code);
        }
        self
    }

    /// Attach several type codes in order.
    pub fn add_types(&mut self, codes: impl IntoIterator<Item = TypeCode>) -> &mut Self {
        for code in codes {
            self.add_type(code);
        }
        self
    }

    /// Set the drawing layer.
    ///
    /// Fails with [`FeatureError::LayerOutOfRange`] outside
    /// `LAYER_LOW..=LAYER_HIGH`; the previous layer is kept.
    pub fn add_layer(&mut self, layer: i32) -> Result<&mut Self, FeatureError> {
        if !(i32::from(LAYER_LOW)..=i32::from(LAYER_HIGH)).contains(&layer) {
            return Err(FeatureError::LayerOutOfRange(layer));
        }
        self.layer = layer as i8;
        Ok(self)
    }

    /// Set the display name. An empty string clears it.
    pub fn add_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    /// Kind implied by the geometry added so far.
    ///
    /// Compares raw coordinates. The encoder repeats this check on the
    /// quantized boundary, so endpoints that share a grid cell encode as an
    /// area even when this returns [`GeometryKind::Line`].
    pub fn geometry_kind(&self) -> GeometryKind {
        if !self.triangles.is_empty() || self.is_closed_ring() {
            GeometryKind::Area
        } else if self.points.len() >= 2 {
            GeometryKind::Line
        } else {
            GeometryKind::Point
        }
    }

    /// True when the boundary has at least four points and ends where it starts.
    pub fn is_closed_ring(&self) -> bool {
        self.points.len() >= 4 && self.points.first() == self.points.last()
    }

    pub fn points(&self) -> &[PointD] {
        &self.points
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn types(&self) -> &[TypeCode] {
        &self.types
    }

    pub fn layer(&self) -> i8 {
        self.layer
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when no boundary point or triangle has been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.triangles.is_empty()
    }

    /// Bounding rectangle of every point and triangle vertex, unquantized.
    pub fn limit_rect(&self) -> RectD {
        let mut rect = RectD::from_points(&self.points);
        for triangle in &self.triangles {
            for v in triangle.vertices() {
                rect.add(v);
            }
        }
        rect
    }
}
