//! Douglas–Peucker polyline generalization.
//!
//! Both entry points return a subset of the input points, in input order,
//! whose distance from the original path never exceeds `tolerance`. Endpoints
//! are always kept, so lines keep their ends and closed rings stay closed.

use super::PointD;

/// Simplify an open polyline.
///
/// Returns the input unchanged when it has two points or fewer.
pub fn simplify_line(points: &[PointD], tolerance: f64) -> Vec<PointD> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    mark_kept(points, 0, points.len() - 1, tolerance, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplify a closed ring (first point equals last point).
///
/// The ring is split at the vertex farthest from its start so that each half
/// has a proper baseline; the halves are simplified independently and joined.
pub fn simplify_ring(points: &[PointD], tolerance: f64) -> Vec<PointD> {
    if points.len() <= 4 {
        return points.to_vec();
    }

    let start = points[0];
    let split = points
        .iter()
        .enumerate()
        .skip(1)
        .take(points.len() - 2)
        .max_by(|(_, a), (_, b)| start.distance_sq(a).total_cmp(&start.distance_sq(b)))
        .map(|(i, _)| i)
        .unwrap_or(points.len() / 2);

    let mut result = simplify_line(&points[..=split], tolerance);
    result.pop();
    result.extend(simplify_line(&points[split..], tolerance));
    result
}

// Iterative to keep stack depth independent of the point count.
fn mark_kept(points: &[PointD], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    let mut stack = vec![(first, last)];

    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_idx = first;
        for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
            let dist = segment_distance(*p, points[first], points[last]);
            if dist > max_dist {
                max_dist = dist;
                max_idx = i;
            }
        }

        if max_dist > tolerance {
            keep[max_idx] = true;
            stack.push((first, max_idx));
            stack.push((max_idx, last));
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: PointD, a: PointD, b: PointD) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-24 {
        return p.distance_sq(&a).sqrt();
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj = PointD::new(a.x + t * dx, a.y + t * dy);
    p.distance_sq(&proj).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<PointD> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn test_short_line_unchanged() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(simplify_line(&line, 10.0), line);
        assert!(simplify_line(&[], 1.0).is_empty());
    }

    #[test]
    fn test_collinear_points_removed() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(simplify_line(&line, 0.01), pts(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_significant_vertex_kept() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.501), (2.0, 1.0), (3.0, 0.0)]);
        let simplified = simplify_line(&line, 0.1);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (2.0, 1.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_zero_tolerance_keeps_all_non_collinear() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.5), (2.0, 0.0), (3.0, 0.5)]);
        assert_eq!(simplify_line(&line, 0.0), line);
    }

    #[test]
    fn test_ring_stays_closed() {
        let ring = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (1.0, 2.0001),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        let simplified = simplify_ring(&ring, 0.01);
        assert_eq!(simplified.first(), simplified.last());
        assert_eq!(
            simplified,
            pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn test_small_ring_unchanged() {
        let ring = pts(&[(1.0, 1.0), (0.25, 0.5), (0.25, 0.2), (1.0, 1.0)]);
        assert_eq!(simplify_ring(&ring, 100.0), ring);
    }

    proptest! {
        /// Property: simplification keeps endpoints and never adds points.
        #[test]
        fn prop_line_keeps_endpoints(
            coords in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 2..40),
            tolerance in 0.0f64..5.0,
        ) {
            let line: Vec<PointD> = coords.into_iter().map(PointD::from).collect();
            let simplified = simplify_line(&line, tolerance);
            prop_assert!(simplified.len() <= line.len());
            prop_assert!(simplified.len() >= 2);
            prop_assert_eq!(simplified.first(), line.first());
            prop_assert_eq!(simplified.last(), line.last());
        }

        /// Property: every dropped vertex lies within tolerance of the simplified path.
        #[test]
        fn prop_deviation_is_bounded(
            coords in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 3..30),
            tolerance in 0.01f64..2.0,
        ) {
            let line: Vec<PointD> = coords.into_iter().map(PointD::from).collect();
            let simplified = simplify_line(&line, tolerance);
            for p in &line {
                let nearest = simplified
                    .windows(2)
                    .map(|w| segment_distance(*p, w[0], w[1]))
                    .fold(f64::INFINITY, f64::min);
                prop_assert!(nearest <= tolerance + 1e-9);
            }
        }
    }
}
