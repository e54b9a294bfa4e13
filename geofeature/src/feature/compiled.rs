//! Immutable, compactly encoded features.

use std::fmt::{self, Write as _};

use bytes::Bytes;
use tracing::trace;

use crate::config::{tier_index, validate_tier_levels, MAX_LEVEL};
use crate::geometry::{
    PointD, QuantizedPoint, Quantizer, RectD, Triangle, MAX_COORD_BITS, MIN_COORD_BITS,
};
use crate::taxonomy::{Taxonomy, TypeCode};

use super::builder::FeatureBuilder;
use super::codec::FeatureEncoder;
use super::types::{FeatureError, GeometryKind, LAYER_HIGH, LAYER_LOW};
use super::wire::{
    PointCursor, WireReader, HAS_LAYER, HAS_NAME, HAS_RECT, HEADER_MASK, KIND_MASK,
};

/// Location of a point run inside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Span {
    /// Number of points
    pub(super) count: usize,
    /// Byte offset of the first point
    pub(super) offset: usize,
}

/// A feature in its stored form.
///
/// Holds the encoded record plus an index of where each geometry tier and the
/// triangle list start. Attributes are decoded once; points and triangles are
/// decoded on every visit, so a compiled feature costs little more memory
/// than its bytes. Instances are immutable and can be read from many threads
/// at once.
///
/// # Example
///
/// ```
/// use geofeature::feature::{CompiledFeature, FeatureBuilder, GeometryKind};
/// use geofeature::geometry::PointD;
///
/// let mut builder = FeatureBuilder::new();
/// builder
///     .add_point(PointD::new(0.0, 0.0))
///     .add_point(PointD::new(2.0, 1.0))
///     .add_name("track");
///
/// let feature = CompiledFeature::encode(builder);
/// assert_eq!(feature.feature_type(), GeometryKind::Line);
/// assert_eq!(feature.name(), Some("track"));
/// assert_eq!(feature.points(17).count(), 2);
///
/// let reparsed = CompiledFeature::from_bytes(feature.as_bytes().clone())?;
/// assert_eq!(reparsed, feature);
/// # Ok::<(), geofeature::feature::FeatureError>(())
/// ```
#[derive(Clone)]
pub struct CompiledFeature {
    pub(super) data: Bytes,
    pub(super) kind: GeometryKind,
    pub(super) quantizer: Quantizer,
    pub(super) types: Vec<TypeCode>,
    pub(super) layer: i8,
    pub(super) name: Option<String>,
    pub(super) rect: Option<(QuantizedPoint, QuantizedPoint)>,
    pub(super) tier_levels: Vec<u8>,
    /// One span per tier, coarse to fine, with "same as finer" resolved
    pub(super) tiers: Vec<Span>,
    /// `count` is the number of triangles
    pub(super) triangles: Span,
}

impl CompiledFeature {
    /// Encode a builder with the default codec configuration.
    pub fn encode(builder: FeatureBuilder) -> Self {
        FeatureEncoder::default().encode(builder)
    }

    /// Parse and validate an encoded record.
    ///
    /// The whole record is checked here, including every coordinate, so the
    /// accessors never fail afterwards.
    pub fn from_bytes(data: Bytes) -> Result<Self, FeatureError> {
        let mut reader = WireReader::new(&data, 0);

        let header = reader.read_u8()?;
        if header & !HEADER_MASK != 0 {
            return Err(FeatureError::InvalidHeader(header));
        }
        let kind = GeometryKind::try_from(header & KIND_MASK)?;

        let bits = reader.read_u8()?;
        if !(MIN_COORD_BITS..=MAX_COORD_BITS).contains(&bits) {
            return Err(FeatureError::UnsupportedCoordBits(bits));
        }
        let quantizer = Quantizer::new(bits);
        let max = quantizer.max_value();

        let type_count = reader.read_count()?;
        let mut types = Vec::with_capacity(type_count);
        for _ in 0..type_count {
            types.push(TypeCode::from_raw(reader.read_varint()?)?);
        }

        let layer = if header & HAS_LAYER != 0 {
            let layer = reader.read_i8()?;
            if !(LAYER_LOW..=LAYER_HIGH).contains(&layer) {
                return Err(FeatureError::LayerOutOfRange(i32::from(layer)));
            }
            layer
        } else {
            0
        };

        let name = if header & HAS_NAME != 0 {
            let len = reader.read_count()?;
            let bytes = reader.read_bytes(len)?;
            Some(std::str::from_utf8(bytes)?.to_string())
        } else {
            None
        };

        let rect = if header & HAS_RECT != 0 {
            let low = QuantizedPoint::new(reader.read_coord(max)?, reader.read_coord(max)?);
            let high = QuantizedPoint::new(reader.read_coord(max)?, reader.read_coord(max)?);
            if low.x > high.x || low.y > high.y {
                return Err(FeatureError::InvalidRect);
            }
            Some((low, high))
        } else {
            None
        };

        let (tier_levels, tiers) = match kind {
            GeometryKind::Point => {
                let count = reader.read_count()?;
                if count > 1 {
                    return Err(FeatureError::InvalidPointCount(count as u64));
                }
                let offset = reader.skip_points(count, None, max)?;
                (vec![MAX_LEVEL], vec![Span { count, offset }])
            }
            GeometryKind::Line | GeometryKind::Area => read_tiers(&mut reader, max)?,
        };

        let triangle_count = reader.read_count()?;
        let offset = reader.skip_points(triangle_count * 3, Some(QuantizedPoint::default()), max)?;
        let triangles = Span {
            count: triangle_count,
            offset,
        };

        if reader.remaining() > 0 {
            return Err(FeatureError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            data,
            kind,
            quantizer,
            types,
            layer,
            name,
            rect,
            tier_levels,
            tiers,
            triangles,
        })
    }

    /// The encoded record.
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn feature_type(&self) -> GeometryKind {
        self.kind
    }

    pub fn layer(&self) -> i8 {
        self.layer
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn types(&self) -> &[TypeCode] {
        &self.types
    }

    /// Visit every type code in insertion order.
    pub fn for_each_type(&self, f: impl FnMut(TypeCode)) {
        self.types.iter().copied().for_each(f);
    }

    /// The grid the coordinates were stored on.
    pub fn quantizer(&self) -> Quantizer {
        self.quantizer
    }

    /// Bounding rectangle of every stored point and triangle vertex.
    ///
    /// Empty for a feature without geometry.
    pub fn limit_rect(&self) -> RectD {
        match self.rect {
            Some((min, max)) => {
                let min = self.quantizer.dequantize(min);
                let max = self.quantizer.dequantize(max);
                RectD::new(min.x, min.y, max.x, max.y)
            }
            None => RectD::empty(),
        }
    }

    /// Number of boundary tiers. Point features have a single tier.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Upper level of each tier, coarse to fine.
    pub fn tier_levels(&self) -> &[u8] {
        &self.tier_levels
    }

    /// Boundary points of the tier serving `level`, in boundary order.
    ///
    /// Levels past the finest tier are served by the finest tier.
    pub fn points(&self, level: u8) -> impl Iterator<Item = PointD> + '_ {
        let quantizer = self.quantizer;
        self.tier_span(level)
            .into_iter()
            .flat_map(move |span| {
                PointCursor::new(&self.data, span.offset, span.count, None, quantizer.max_value())
            })
            .map(move |q| quantizer.dequantize(q))
    }

    /// Visit the boundary points of the tier serving `level`.
    pub fn for_each_point(&self, level: u8, f: impl FnMut(PointD)) {
        self.points(level).for_each(f);
    }

    /// Number of boundary points served at `level`.
    pub fn point_count(&self, level: u8) -> usize {
        self.tier_span(level).map_or(0, |span| span.count)
    }

    /// Fill triangles. Triangles are never simplified, so every level sees
    /// the full list.
    pub fn triangles(&self, _level: u8) -> impl Iterator<Item = Triangle> + '_ {
        let quantizer = self.quantizer;
        let mut vertices = PointCursor::new(
            &self.data,
            self.triangles.offset,
            self.triangles.count * 3,
            Some(QuantizedPoint::default()),
            quantizer.max_value(),
        )
        .map(move |q| quantizer.dequantize(q));
        std::iter::from_fn(move || {
            Some(Triangle::new(vertices.next()?, vertices.next()?, vertices.next()?))
        })
    }

    /// Visit every triangle as its three vertices.
    pub fn for_each_triangle(&self, level: u8, mut f: impl FnMut(PointD, PointD, PointD)) {
        for t in self.triangles(level) {
            f(t.a, t.b, t.c);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.count
    }

    /// True when at least one type is visible at `level`.
    ///
    /// Codes the taxonomy does not know never make a feature visible.
    pub fn is_visible_at(&self, taxonomy: &Taxonomy, level: u8) -> bool {
        self.types.iter().any(|&code| {
            taxonomy
                .min_visible_level(code)
                .is_some_and(|min_level| min_level <= level)
        })
    }

    /// Rebuild a mutable feature from the finest tier.
    ///
    /// Coordinates come back snapped to the grid, so encoding the result with
    /// the same configuration reproduces this feature.
    pub fn to_builder(&self) -> FeatureBuilder {
        FeatureBuilder::from_parts(
            self.points(u8::MAX).collect(),
            self.triangles(u8::MAX).collect(),
            self.types.clone(),
            self.layer,
            self.name.clone(),
        )
    }

    /// Human-readable dump of the feature as seen at `level`.
    pub fn debug_string(&self, level: u8) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_debug(&mut out, level);
        out
    }

    fn write_debug(&self, out: &mut String, level: u8) -> fmt::Result {
        write!(out, "{} types=[", self.kind)?;
        for (i, code) in self.types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{code}")?;
        }
        write!(out, "] layer={}", self.layer)?;
        if let Some(name) = &self.name {
            write!(out, " name={name:?}")?;
        }
        out.push_str(" points=[");
        for (i, p) in self.points(level).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write!(out, "{p}")?;
        }
        out.push_str("] triangles=[");
        for (i, t) in self.triangles(level).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write!(out, "{t}")?;
        }
        write!(out, "] rect={}", self.limit_rect())
    }

    fn tier_span(&self, level: u8) -> Option<Span> {
        if self.tiers.is_empty() {
            return None;
        }
        let tier = tier_index(&self.tier_levels, level);
        trace!(level, tier, "Selected geometry tier");
        self.tiers.get(tier).copied()
    }
}

/// Two features are equal when their records are byte-identical.
impl PartialEq for CompiledFeature {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for CompiledFeature {}

impl fmt::Debug for CompiledFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFeature")
            .field("kind", &self.kind)
            .field("types", &self.types)
            .field("layer", &self.layer)
            .field("name", &self.name)
            .field("tier_levels", &self.tier_levels)
            .field("points", &self.point_count(u8::MAX))
            .field("triangles", &self.triangles.count)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn read_tiers(reader: &mut WireReader<'_>, max: u32) -> Result<(Vec<u8>, Vec<Span>), FeatureError> {
    let tier_count = usize::from(reader.read_u8()?);
    let mut levels = Vec::with_capacity(tier_count);
    let mut spans = Vec::with_capacity(tier_count);

    for _ in 0..tier_count {
        levels.push(reader.read_u8()?);
        let count = reader.read_count()?;
        let offset = reader.skip_points(count, None, max)?;
        spans.push(Span { count, offset });
    }

    if tier_count > 0 {
        validate_tier_levels(&levels)
            .map_err(|e| FeatureError::InvalidTierTable(e.to_string()))?;
    }
    resolve_tiers(&mut spans)?;
    Ok((levels, spans))
}

/// Replace every empty tier with the next finer non-empty one.
fn resolve_tiers(spans: &mut [Span]) -> Result<(), FeatureError> {
    let mut finer: Option<Span> = None;
    for (tier, span) in spans.iter_mut().enumerate().rev() {
        if span.count == 0 {
            *span = finer.ok_or(FeatureError::DanglingTierReference { tier })?;
        }
        finer = Some(*span);
    }
    Ok(())
}
