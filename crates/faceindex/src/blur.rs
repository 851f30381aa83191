//! Blur detection (C6): direction-conditional Laplacian-variance sharpness score.

use crate::detection::FaceDetection;
use crate::warp::FACE_SIZE;

/// Total columns stripped from the 112-wide crop before the Laplacian is applied.
const REMOVE_SIDE_COLUMNS: usize = 56;

/// Which way the face in a crop is turned, determined from its five landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceDirection {
    Left,
    Right,
    Straight,
}

/// Determines face direction from landmarks in any consistent coordinate frame (normalized or
/// pixel), since every comparison below is scale-invariant within a single landmark set.
pub fn face_direction(detection: &FaceDetection) -> FaceDirection {
    let left_eye = detection.left_eye();
    let right_eye = detection.right_eye();
    let nose = detection.nose();
    let left_mouth = detection.left_mouth();
    let right_mouth = detection.right_mouth();

    let eye_distance_x = (right_eye.x - left_eye.x).abs();
    let eye_distance_y = (right_eye.y - left_eye.y).abs();
    let mouth_distance_y = (right_mouth.y - left_mouth.y).abs();

    let face_is_upright = left_eye.y.max(right_eye.y) + 0.5 * eye_distance_y < nose.y
        && nose.y + 0.5 * mouth_distance_y < left_mouth.y.min(right_mouth.y);

    let nose_sticking_out_left =
        nose.x < left_eye.x.min(right_eye.x) && nose.x < left_mouth.x.min(right_mouth.x);
    let nose_sticking_out_right =
        nose.x > left_eye.x.max(right_eye.x) && nose.x > left_mouth.x.max(right_mouth.x);

    let nose_close_to_left_eye = (nose.x - left_eye.x).abs() < 0.2 * eye_distance_x;
    let nose_close_to_right_eye = (nose.x - right_eye.x).abs() < 0.2 * eye_distance_x;

    if nose_sticking_out_left || (face_is_upright && nose_close_to_left_eye) {
        FaceDirection::Left
    } else if nose_sticking_out_right || (face_is_upright && nose_close_to_right_eye) {
        FaceDirection::Right
    } else {
        FaceDirection::Straight
    }
}

/// A row-major grid of integer luma values, with explicit `rows`/`cols` rather than a nested
/// `Vec<Vec<_>>` so that the padding/convolution below are plain index arithmetic.
struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Grid {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0i64; rows * cols],
        }
    }

    #[inline]
    fn get(&self, r: usize, c: usize) -> i64 {
        self.data[r * self.cols + c]
    }

    #[inline]
    fn set(&mut self, r: usize, c: usize, v: i64) {
        self.data[r * self.cols + c] = v;
    }
}

/// Converts an aligned RGB crop (channel-last, row-major, values in `[-1.0, 1.0]` per the warp's
/// normalization) back to 8-bit luma using the standard BT.601 luminance formula.
fn to_grayscale(aligned_rgb: &[f32]) -> Grid {
    let mut grid = Grid::new(FACE_SIZE, FACE_SIZE);
    for y in 0..FACE_SIZE {
        for x in 0..FACE_SIZE {
            let idx = (y * FACE_SIZE + x) * 3;
            let to_u8 = |v: f32| ((v + 1.0) * 127.5) as f64;
            let (r, g, b) = (
                to_u8(aligned_rgb[idx]),
                to_u8(aligned_rgb[idx + 1]),
                to_u8(aligned_rgb[idx + 2]),
            );
            let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0);
            grid.set(y, x, luma as i64);
        }
    }
    grid
}

/// Strips `REMOVE_SIDE_COLUMNS` columns (split by direction) and pads the remainder by one
/// row/column on every side using one-step reflection.
///
/// The padded image keeps `cols + 2 - REMOVE_SIDE_COLUMNS` columns (not the same count arrived at
/// by simplifying `cols - REMOVE_SIDE_COLUMNS + 2` differently), and its reflected border repeats
/// the second inner row/column, not the first.
fn pad_for_direction(image: &Grid, direction: FaceDirection) -> Grid {
    let rows = image.rows;
    let cols = image.cols;
    let padded_cols = cols + 2 - REMOVE_SIDE_COLUMNS;
    let padded_rows = rows + 2;
    let mut padded = Grid::new(padded_rows, padded_cols);

    let start_col = match direction {
        FaceDirection::Straight => REMOVE_SIDE_COLUMNS / 2,
        FaceDirection::Left => REMOVE_SIDE_COLUMNS,
        FaceDirection::Right => 0,
    };
    let copy_cols = padded_cols.saturating_sub(2);

    for i in 0..rows {
        for j in 0..copy_cols {
            padded.set(i + 1, j + 1, image.get(i, j + start_col));
        }
    }

    if copy_cols > 0 {
        for j in 1..=copy_cols {
            let v = padded.get(2, j);
            padded.set(0, j, v);
        }
        for j in 1..=copy_cols {
            let v = padded.get(rows - 1, j);
            padded.set(rows + 1, j, v);
        }
    }
    for i in 0..padded_rows {
        let left = padded.get(i, 2);
        padded.set(i, 0, left);
        let right = padded.get(i, padded_cols - 3);
        padded.set(i, padded_cols - 1, right);
    }

    padded
}

/// Four-connected discrete Laplacian.
const KERNEL: [[i64; 3]; 3] = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

fn apply_laplacian(padded: &Grid) -> Grid {
    let rows = padded.rows.saturating_sub(2);
    let cols = padded.cols.saturating_sub(2);
    let mut out = Grid::new(rows, cols);

    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0i64;
            for ki in 0..3 {
                for kj in 0..3 {
                    sum += padded.get(i + ki, j + kj) * KERNEL[ki][kj];
                }
            }
            out.set(i, j, sum);
        }
    }
    out
}

/// Population variance (not the unbiased sample variance) of every value in `grid`.
fn variance(grid: &Grid) -> f64 {
    if grid.data.is_empty() {
        return 0.0;
    }
    let total = grid.data.len() as f64;
    let mean: f64 = grid.data.iter().map(|&v| v as f64).sum::<f64>() / total;
    let sum_sq_diff: f64 = grid
        .data
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum();
    sum_sq_diff / total
}

/// Computes the blur (sharpness) score of an aligned 112x112 RGB crop: larger is sharper.
pub fn compute_blur(aligned_rgb: &[f32], direction: FaceDirection) -> f64 {
    let gray = to_grayscale(aligned_rgb);
    let padded = pad_for_direction(&gray, direction);
    let laplacian = apply_laplacian(&padded);
    variance(&laplacian)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faceindex_geom::{Point, Rect};

    fn detection_with_landmarks(landmarks: [Point; 5]) -> FaceDetection {
        FaceDetection {
            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
            score: 1.0,
            landmarks,
        }
    }

    #[test]
    fn s5_direction_is_left() {
        let detection = detection_with_landmarks([
            Point::new(0.3, 0.3),
            Point::new(0.7, 0.3),
            Point::new(0.31, 0.55),
            Point::new(0.35, 0.8),
            Point::new(0.65, 0.8),
        ]);
        assert_eq!(face_direction(&detection), FaceDirection::Left);
    }

    #[test]
    fn symmetric_landmarks_are_straight() {
        let detection = detection_with_landmarks([
            Point::new(0.3, 0.3),
            Point::new(0.7, 0.3),
            Point::new(0.5, 0.55),
            Point::new(0.35, 0.8),
            Point::new(0.65, 0.8),
        ]);
        assert_eq!(face_direction(&detection), FaceDirection::Straight);
    }

    #[test]
    fn s6_constant_crop_has_zero_blur() {
        let aligned = vec![0.2f32; FACE_SIZE * FACE_SIZE * 3];
        let blur = compute_blur(&aligned, FaceDirection::Straight);
        assert!((blur - 0.0).abs() < 1e-6);
    }

    #[test]
    fn sharp_edge_increases_blur_score() {
        let mut aligned = vec![-1.0f32; FACE_SIZE * FACE_SIZE * 3];
        for y in 0..FACE_SIZE {
            for x in (FACE_SIZE / 2)..FACE_SIZE {
                let idx = (y * FACE_SIZE + x) * 3;
                aligned[idx] = 1.0;
                aligned[idx + 1] = 1.0;
                aligned[idx + 2] = 1.0;
            }
        }
        let blur = compute_blur(&aligned, FaceDirection::Straight);
        assert!(blur > 0.0);
    }

    #[test]
    fn padding_dimensions_match_reference_arithmetic() {
        let gray = Grid::new(FACE_SIZE, FACE_SIZE);
        let padded = pad_for_direction(&gray, FaceDirection::Straight);
        assert_eq!(padded.cols, FACE_SIZE + 2 - REMOVE_SIDE_COLUMNS);
        assert_eq!(padded.rows, FACE_SIZE + 2);
    }
}
