//! Axis-aligned bounding rectangle.

use std::fmt;

use super::PointD;

/// Axis-aligned rectangle in the projected plane.
///
/// A freshly created rectangle is empty (`min > max`); adding a single point
/// makes it point-sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectD {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl RectD {
    /// An empty rectangle that contains nothing.
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Smallest rectangle containing every point.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a PointD>) -> Self {
        let mut rect = Self::empty();
        for p in points {
            rect.add(*p);
        }
        rect
    }

    /// Grow the rectangle to include `p`.
    pub fn add(&mut self, p: PointD) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Returns true if `p` lies inside the rectangle grown by `eps` on every side.
    pub fn contains_with_eps(&self, p: PointD, eps: f64) -> bool {
        !self.is_empty()
            && p.x >= self.min_x - eps
            && p.x <= self.max_x + eps
            && p.y >= self.min_y - eps
            && p.y <= self.max_y + eps
    }

    pub fn contains(&self, p: PointD) -> bool {
        self.contains_with_eps(p, 0.0)
    }

    /// Returns true if the two rectangles overlap (touching edges count).
    pub fn intersects(&self, other: &RectD) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

impl Default for RectD {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for RectD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[empty]");
        }
        write!(
            f,
            "[{:.7}, {:.7}, {:.7}, {:.7}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
