use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// Whether the coordinates are in source-image pixels, model-canvas pixels, or the normalized
/// `[0, 1]` unit square is determined by context, not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scales both coordinates independently.
    #[inline]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    /// Translates the point by `(dx, dy)`.
    #[inline]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Divides both coordinates by the given [`Dimensions`], producing a point in `[0, 1]` if the
    /// original point was inside the bounds (this function does not clamp).
    #[inline]
    pub fn normalize_by(self, dims: super::Dimensions) -> Self {
        Self::new(self.x / dims.width as f64, self.y / dims.height as f64)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimensions;

    #[test]
    fn scale_and_translate() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.scale(2.0, 3.0), Point::new(2.0, 6.0));
        assert_eq!(p.translate(1.0, -1.0), Point::new(2.0, 1.0));
    }

    #[test]
    fn normalize_does_not_clamp() {
        let p = Point::new(150.0, -10.0);
        let dims = Dimensions::new(100, 100);
        let n = p.normalize_by(dims);
        assert_eq!(n, Point::new(1.5, -0.1));
    }
}
