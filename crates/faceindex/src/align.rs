//! Similarity-transform alignment (C4).
//!
//! Fits a 2D similarity transform (rotation, isotropic scale, translation) from the five detected
//! landmarks to a fixed ideal template, producing a full affine rather than a single rotation
//! angle.

use nalgebra::{Matrix2, Vector2};

use faceindex_geom::{Point, Rect};
use faceindex_utils::iter::zip_exact;

use crate::detection::FaceDetection;
use crate::error::{Error, Result};

/// Side length of the aligned face crop.
pub const CROP_SIZE: f64 = 112.0;

/// The canonical MobileFaceNet landmark template, in a 112x112 crop, in landmark order (left eye,
/// right eye, nose, left mouth, right mouth).
pub const IDEAL_LANDMARKS_112: [(f64, f64); 5] = [
    (38.2946, 51.6963),
    (73.5318, 51.5014),
    (56.0252, 71.7366),
    (41.5493, 92.3655),
    (70.7299, 92.2041),
];

/// Below this, the source landmarks' covariance is considered numerically degenerate.
const SINGULAR_VALUE_EPSILON: f64 = 1e-9;

/// A fitted similarity transform: a 2x2 rotation-scale matrix and a 2x1 translation, together
/// forming the affine `[[rs00, rs01, tr0], [rs10, rs11, tr1], [0, 0, 1]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAlignment {
    pub rotation_scale: Matrix2<f64>,
    pub translation: Vector2<f64>,
    pub bounding_box: Rect,
}

impl FaceAlignment {
    /// Applies the fitted affine to a point in source coordinates, producing a point in the
    /// normalized (pre-scale-by-112) template frame.
    pub fn apply(&self, p: Point) -> Point {
        let v = self.rotation_scale * Vector2::new(p.x, p.y) + self.translation;
        Point::new(v.x, v.y)
    }
}

fn ideal_landmarks_unit_square() -> [Vector2<f64>; 5] {
    IDEAL_LANDMARKS_112.map(|(x, y)| Vector2::new(x / CROP_SIZE, y / CROP_SIZE))
}

fn centroid(points: &[Vector2<f64>; 5]) -> Vector2<f64> {
    points.iter().sum::<Vector2<f64>>() / points.len() as f64
}

/// Fits a similarity transform taking `detection`'s five landmarks onto the ideal template,
/// and derives the source-space bounding box the resulting 112x112 crop will cover.
///
/// Returns [`Error::DegenerateAlignment`] if the detected landmarks are numerically coincident.
pub fn fit(detection: &FaceDetection) -> Result<FaceAlignment> {
    let from: [Vector2<f64>; 5] = detection.landmarks.map(|p| Vector2::new(p.x, p.y));
    let to = ideal_landmarks_unit_square();

    let from_mean = centroid(&from);
    let to_mean = centroid(&to);

    let from_centered: Vec<Vector2<f64>> = from.iter().map(|p| p - from_mean).collect();
    let to_centered: Vec<Vector2<f64>> = to.iter().map(|p| p - to_mean).collect();

    // Cross-covariance of the centered point sets. Both sides are always exactly 5 landmarks
    // long, so a length mismatch here would mean a bug upstream, not a legitimately shorter input.
    let mut cov = Matrix2::zeros();
    for (f, t) in zip_exact(from_centered.iter(), to_centered.iter()) {
        cov += t * f.transpose();
    }
    cov /= from.len() as f64;

    let src_var: f64 = from_centered.iter().map(|p| p.norm_squared()).sum::<f64>() / from.len() as f64;

    let svd = cov.svd(true, true);
    let (u, s, v_t) = match (svd.u, svd.singular_values, svd.v_t) {
        (Some(u), s, Some(v_t)) => (u, s, v_t),
        _ => return Err(Error::DegenerateAlignment),
    };

    if s[0].abs() < SINGULAR_VALUE_EPSILON || src_var.abs() < SINGULAR_VALUE_EPSILON {
        return Err(Error::DegenerateAlignment);
    }

    // Reflection correction: if det(U * V^T) < 0, flip the sign of the smaller singular value's
    // contribution so the fit is a proper rotation rather than a reflection.
    let det_uvt = (u * v_t).determinant();
    let mut d = Vector2::new(1.0, 1.0);
    if det_uvt < 0.0 {
        d[1] = -1.0;
    }

    let rotation = u * Matrix2::from_diagonal(&d) * v_t;
    let scale = (s[0] * d[0] + s[1] * d[1]) / src_var;

    if !scale.is_finite() || scale.abs() < SINGULAR_VALUE_EPSILON {
        return Err(Error::DegenerateAlignment);
    }

    let rotation_scale = rotation * scale;
    let translation = to_mean - rotation_scale * from_mean;

    let size = 1.0 / scale;
    let mean_translation = Vector2::new((to_mean.x - 0.5) * size, (to_mean.y - 0.5) * size);
    let center = from_mean - mean_translation;
    let bounding_box = Rect::new(center.x - size / 2.0, center.y - size / 2.0, size, size);

    Ok(FaceAlignment {
        rotation_scale,
        translation,
        bounding_box,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use faceindex_geom::Rect;

    fn detection_from_landmarks(landmarks: [Point; 5]) -> FaceDetection {
        FaceDetection {
            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
            score: 1.0,
            landmarks,
        }
    }

    fn well_posed_landmarks() -> [Point; 5] {
        // A plausible upright face, roughly matching the template's proportions, scaled up and
        // translated into "source image" coordinates.
        let scale = 200.0;
        IDEAL_LANDMARKS_112.map(|(x, y)| Point::new(x / CROP_SIZE * scale + 50.0, y / CROP_SIZE * scale + 30.0))
    }

    #[test]
    fn fits_without_degenerating_on_well_posed_landmarks() {
        let detection = detection_from_landmarks(well_posed_landmarks());
        let alignment = fit(&detection).unwrap();
        assert!(alignment.rotation_scale.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn coincident_landmarks_are_degenerate() {
        let p = Point::new(10.0, 10.0);
        let detection = detection_from_landmarks([p; 5]);
        let err = fit(&detection).unwrap_err();
        assert!(matches!(err, Error::DegenerateAlignment));
    }

    #[test]
    fn applying_fit_recovers_template_landmarks() {
        let detection = detection_from_landmarks(well_posed_landmarks());
        let alignment = fit(&detection).unwrap();
        let template = ideal_landmarks_unit_square();

        for (p, expected) in zip_exact(detection.landmarks.iter(), template.iter()) {
            let mapped = alignment.apply(*p);
            approx::assert_relative_eq!(mapped.x, expected.x, epsilon = 1e-6);
            approx::assert_relative_eq!(mapped.y, expected.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn bounding_box_is_square() {
        let detection = detection_from_landmarks(well_posed_landmarks());
        let alignment = fit(&detection).unwrap();
        approx::assert_relative_eq!(
            alignment.bounding_box.width,
            alignment.bounding_box.height,
            epsilon = 1e-9
        );
    }
}
