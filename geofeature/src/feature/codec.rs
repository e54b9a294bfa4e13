//! Feature encoder - turns a [`FeatureBuilder`] into a [`CompiledFeature`].

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::config::{CodecConfig, ConfigError, MAX_LEVEL};
use crate::geometry::{simplify_line, simplify_ring, PointD, QuantizedPoint, Quantizer};

use super::builder::FeatureBuilder;
use super::compiled::{CompiledFeature, Span};
use super::types::GeometryKind;
use super::wire::{put_points, put_varint, HAS_LAYER, HAS_NAME, HAS_RECT};

/// Encodes features with one codec configuration.
///
/// # Example
///
/// ```
/// use geofeature::config::CodecConfig;
/// use geofeature::feature::{FeatureBuilder, FeatureEncoder};
/// use geofeature::geometry::PointD;
///
/// let encoder = FeatureEncoder::new(CodecConfig::new().with_tier_levels(vec![10, 17]))?;
///
/// let mut builder = FeatureBuilder::new();
/// for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
///     builder.add_point(PointD::new(x, y));
/// }
/// let feature = encoder.encode(builder);
/// assert_eq!(feature.tier_count(), 2);
/// # Ok::<(), geofeature::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    config: CodecConfig,
    quantizer: Quantizer,
}

impl FeatureEncoder {
    /// Create an encoder, rejecting an invalid configuration.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let quantizer = Quantizer::new(config.coord_bits());
        Ok(Self { config, quantizer })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn quantizer(&self) -> Quantizer {
        self.quantizer
    }

    /// Encode a feature. Never fails: any builder, including an empty one,
    /// has an encoding.
    pub fn encode(&self, builder: FeatureBuilder) -> CompiledFeature {
        let q = self.quantizer;

        let mut boundary: Vec<QuantizedPoint> =
            builder.points().iter().map(|&p| q.quantize(p)).collect();
        // Closure is judged on the grid: endpoints sharing a cell close the ring.
        let closed = is_closed_ring(&boundary);
        let kind = if !builder.triangles().is_empty() || closed {
            GeometryKind::Area
        } else if boundary.len() >= 2 {
            GeometryKind::Line
        } else {
            GeometryKind::Point
        };
        if kind == GeometryKind::Point {
            boundary.truncate(1);
        }
        let vertices: Vec<QuantizedPoint> = builder
            .triangles()
            .iter()
            .flat_map(|t| t.vertices())
            .map(|p| q.quantize(p))
            .collect();
        let rect = quantized_bounds(boundary.iter().chain(&vertices));

        let mut buf = BytesMut::new();

        let mut header = kind.tag();
        if builder.layer() != 0 {
            header |= HAS_LAYER;
        }
        if builder.name().is_some() {
            header |= HAS_NAME;
        }
        if rect.is_some() {
            header |= HAS_RECT;
        }
        buf.put_u8(header);
        buf.put_u8(q.bits());

        put_varint(&mut buf, builder.types().len() as u64);
        for code in builder.types() {
            put_varint(&mut buf, code.raw());
        }
        if builder.layer() != 0 {
            buf.put_i8(builder.layer());
        }
        if let Some(name) = builder.name() {
            put_varint(&mut buf, name.len() as u64);
            buf.put_slice(name.as_bytes());
        }
        if let Some((low, high)) = rect {
            for v in [low.x, low.y, high.x, high.y] {
                put_varint(&mut buf, u64::from(v));
            }
        }

        let (tier_levels, tiers) = match kind {
            GeometryKind::Point => {
                put_varint(&mut buf, boundary.len() as u64);
                let offset = buf.len();
                put_points(&mut buf, &boundary, None);
                (
                    vec![MAX_LEVEL],
                    vec![Span {
                        count: boundary.len(),
                        offset,
                    }],
                )
            }
            GeometryKind::Line | GeometryKind::Area => self.put_tiers(&mut buf, &boundary, closed),
        };

        let triangle_count = builder.triangles().len();
        put_varint(&mut buf, triangle_count as u64);
        let offset = buf.len();
        put_points(&mut buf, &vertices, Some(QuantizedPoint::default()));

        let data = buf.freeze();
        debug!(
            kind = %kind,
            points = boundary.len(),
            tiers = tiers.len(),
            triangles = triangle_count,
            bytes = data.len(),
            "Encoded feature"
        );

        let (types, layer, name) = builder.into_attributes();
        CompiledFeature {
            data,
            kind,
            quantizer: q,
            types,
            layer,
            name,
            rect,
            tier_levels,
            tiers,
            triangles: Span {
                count: triangle_count,
                offset,
            },
        }
    }

    /// Write the tier table for a line or area boundary.
    fn put_tiers(
        &self,
        buf: &mut BytesMut,
        boundary: &[QuantizedPoint],
        closed: bool,
    ) -> (Vec<u8>, Vec<Span>) {
        if boundary.is_empty() {
            buf.put_u8(0);
            return (Vec::new(), Vec::new());
        }

        let levels = self.config.tier_levels();
        let simplified = self.simplify_tiers(boundary, closed);

        buf.put_u8(levels.len() as u8);
        let mut spans = Vec::with_capacity(levels.len());
        for (&level, tier) in levels.iter().zip(&simplified) {
            buf.put_u8(level);
            match tier {
                Some(points) => {
                    put_varint(buf, points.len() as u64);
                    let offset = buf.len();
                    put_points(buf, points, None);
                    spans.push(Span {
                        count: points.len(),
                        offset,
                    });
                }
                None => {
                    put_varint(buf, 0);
                    spans.push(Span { count: 0, offset: 0 });
                }
            }
        }

        // The finest tier is always stored, so every empty tier has a source.
        for i in (0..spans.len().saturating_sub(1)).rev() {
            if spans[i].count == 0 {
                spans[i] = spans[i + 1];
            }
        }

        (levels.to_vec(), spans)
    }

    /// Points of each tier, coarse to fine. `None` means "same as the next
    /// finer tier"; the finest tier is always the full boundary.
    fn simplify_tiers(
        &self,
        boundary: &[QuantizedPoint],
        closed: bool,
    ) -> Vec<Option<Vec<QuantizedPoint>>> {
        let q = self.quantizer;
        let levels = self.config.tier_levels();
        let finest = levels.len() - 1;

        let min_points = if closed { 4 } else { 2 };
        let snapped: Vec<PointD> = boundary.iter().map(|&p| q.dequantize(p)).collect();

        let mut tiers = vec![None; levels.len()];
        tiers[finest] = Some(boundary.to_vec());
        let mut finer = finest;

        for tier in (0..finest).rev() {
            let tolerance = CodecConfig::tolerance_for_level(levels[tier]);
            let simplified = if closed {
                simplify_ring(&snapped, tolerance)
            } else {
                simplify_line(&snapped, tolerance)
            };
            let candidate: Vec<QuantizedPoint> =
                simplified.into_iter().map(|p| q.quantize(p)).collect();

            let collapsed = candidate.len() < min_points;
            let unchanged = tiers[finer].as_ref() == Some(&candidate);
            trace!(
                tier,
                level = levels[tier],
                points = candidate.len(),
                collapsed,
                unchanged,
                "Simplified boundary"
            );
            if !collapsed && !unchanged {
                tiers[tier] = Some(candidate);
                finer = tier;
            }
        }

        tiers
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        let config = CodecConfig::default();
        let quantizer = Quantizer::new(config.coord_bits());
        Self { config, quantizer }
    }
}

fn is_closed_ring(boundary: &[QuantizedPoint]) -> bool {
    boundary.len() >= 4 && boundary.first() == boundary.last()
}

/// Grid-space bounding box, `None` when there are no points.
fn quantized_bounds<'a>(
    points: impl IntoIterator<Item = &'a QuantizedPoint>,
) -> Option<(QuantizedPoint, QuantizedPoint)> {
    points.into_iter().fold(None, |bounds, &p| {
        Some(match bounds {
            None => (p, p),
            Some((low, high)) => (
                QuantizedPoint::new(low.x.min(p.x), low.y.min(p.y)),
                QuantizedPoint::new(high.x.max(p.x), high.y.max(p.y)),
            ),
        })
    })
}
