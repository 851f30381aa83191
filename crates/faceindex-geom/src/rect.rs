use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Dimensions, Point};

/// An axis-aligned rectangle, positioned by its top-left corner.
///
/// `width`/`height` are expected to be strictly positive for valid detections, but this type
/// does not enforce that itself. Callers that need the invariant check it at the boundary where
/// it matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Constructs a rectangle from its center point and size.
    #[inline]
    pub fn from_center(xc: f64, yc: f64, width: f64, height: f64) -> Self {
        Self::new(xc - width / 2.0, yc - height / 2.0, width, height)
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scales position and size independently along each axis.
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Translates the rectangle's position, leaving its size unchanged.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Divides position and size by `dims`, producing a rectangle in `[0, 1]` if `self` was
    /// inside the bounds. Does not clamp.
    pub fn normalize_by(&self, dims: Dimensions) -> Self {
        let (w, h) = (dims.width as f64, dims.height as f64);
        Self::new(self.x / w, self.y / h, self.width / w, self.height / h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect {{ x: {:.3}, y: {:.3}, w: {:.3}, h: {:.3} }}",
            self.x, self.y, self.width, self.height
        )
    }
}
