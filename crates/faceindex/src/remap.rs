//! Coordinate remapping between the model canvas and the source image (C3).

use faceindex_geom::{Dimensions, Point, Rect};

use crate::detection::FaceDetection;

/// The detector's fixed square model canvas.
pub const CANVAS_SIZE: u32 = 640;

/// An affine remap between two rectangular frames, expressed as independent per-axis scale and
/// translation (no rotation: both frames are axis-aligned).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remap {
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
}

impl Remap {
    /// Builds the remap that takes points from `in_box` to their position in `to_box`.
    pub fn new(in_box: Rect, to_box: Rect) -> Self {
        Self {
            scale_x: to_box.width / in_box.width,
            scale_y: to_box.height / in_box.height,
            translate_x: to_box.x - in_box.x,
            translate_y: to_box.y - in_box.y,
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(
            (p.x + self.translate_x) * self.scale_x,
            (p.y + self.translate_y) * self.scale_y,
        )
    }

    pub fn rect(&self, r: Rect) -> Rect {
        let top_left = self.point(r.top_left());
        Rect::new(
            top_left.x,
            top_left.y,
            r.width * self.scale_x,
            r.height * self.scale_y,
        )
    }

    pub fn detection(&self, d: &FaceDetection) -> FaceDetection {
        FaceDetection {
            bbox: self.rect(d.bbox),
            score: d.score,
            landmarks: d.landmarks.map(|p| self.point(p)),
        }
    }
}

/// Computes the centered letterbox rectangle (`inBox`) that an image of size `dims` occupies once
/// resized to fit inside the square model canvas while preserving aspect ratio.
pub fn letterbox_in_box(dims: Dimensions) -> Rect {
    let (w, h) = (dims.width as f64, dims.height as f64);
    let canvas = CANVAS_SIZE as f64;
    let scale = (canvas / w).min(canvas / h);
    let sw = (w * scale).round().clamp(0.0, canvas);
    let sh = (h * scale).round().clamp(0.0, canvas);
    Rect::new((canvas - sw) / 2.0, (canvas - sh) / 2.0, sw, sh)
}

/// The source image rectangle, `{0, 0, width, height}`.
pub fn source_to_box(dims: Dimensions) -> Rect {
    Rect::new(0.0, 0.0, dims.width as f64, dims.height as f64)
}

/// Builds the remap that takes model-canvas detections into source-image pixel coordinates, for
/// an image of size `dims`.
pub fn canvas_to_source(dims: Dimensions) -> Remap {
    Remap::new(letterbox_in_box(dims), source_to_box(dims))
}
