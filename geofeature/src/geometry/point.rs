//! Point and triangle types in the projected plane.

use std::fmt;

/// A point in the projected Mercator plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    /// Easting (Mercator X, derived from longitude)
    pub x: f64,
    /// Northing (Mercator Y, derived from latitude)
    pub y: f64,
}

impl PointD {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another point.
    #[inline]
    pub fn distance_sq(&self, other: &PointD) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Returns true when both coordinates differ by at most `eps`.
    #[inline]
    pub fn approx_eq(&self, other: &PointD, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl From<(f64, f64)> for PointD {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.x, self.y)
    }
}

/// A fill triangle. Vertices are independent of the feature boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub a: PointD,
    pub b: PointD,
    pub c: PointD,
}

impl Triangle {
    #[inline]
    pub const fn new(a: PointD, b: PointD, c: PointD) -> Self {
        Self { a, b, c }
    }

    /// Vertices in storage order.
    #[inline]
    pub fn vertices(&self) -> [PointD; 3] {
        [self.a, self.b, self.c]
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.a, self.b, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq() {
        let a = PointD::new(0.0, 0.0);
        let b = PointD::new(3.0, 4.0);
        assert_eq!(a.distance_sq(&b), 25.0);
    }

    #[test]
    fn test_approx_eq() {
        let a = PointD::new(1.0, 1.0);
        assert!(a.approx_eq(&PointD::new(1.0 + 1e-9, 1.0 - 1e-9), 1e-8));
        assert!(!a.approx_eq(&PointD::new(1.1, 1.0), 1e-8));
    }

    #[test]
    fn test_triangle_vertices_order() {
        let t = Triangle::new(
            PointD::new(0.5, 0.5),
            PointD::new(0.25, 0.5),
            PointD::new(1.0, 1.0),
        );
        let [a, b, c] = t.vertices();
        assert_eq!(a, PointD::new(0.5, 0.5));
        assert_eq!(b, PointD::new(0.25, 0.5));
        assert_eq!(c, PointD::new(1.0, 1.0));
    }

    #[test]
    fn test_point_display() {
        assert_eq!(PointD::new(0.25, -1.0).to_string(), "(0.2500000, -1.0000000)");
    }
}
