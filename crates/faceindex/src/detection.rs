//! Detector output decoding (C2).
//!
//! The external detector produces a flat row-major tensor of shape `[25200, 16]`, one row per
//! candidate detection in the 640x640 model canvas. This module turns that into a list of
//! [`FaceDetection`] values, filtering out everything below the score threshold.

use serde::{Deserialize, Serialize};

use faceindex_geom::{Point, Rect};

use crate::error::{Error, Result};

/// Candidate detections are accepted at or above this confidence score.
pub const SCORE_THRESHOLD: f32 = 0.7;

/// Number of candidate rows the detector always emits.
pub const NUM_ROWS: usize = 25_200;

/// Number of `f32` values per detector row.
pub const ROW_LEN: usize = 16;

/// A single accepted detection, in whatever coordinate frame the caller decoded it into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bbox: Rect,
    pub score: f32,
    /// Five landmarks in a fixed order: left eye, right eye, nose, left mouth, right mouth.
    pub landmarks: [Point; 5],
}

impl FaceDetection {
    #[inline]
    pub fn left_eye(&self) -> Point {
        self.landmarks[0]
    }

    #[inline]
    pub fn right_eye(&self) -> Point {
        self.landmarks[1]
    }

    #[inline]
    pub fn nose(&self) -> Point {
        self.landmarks[2]
    }

    #[inline]
    pub fn left_mouth(&self) -> Point {
        self.landmarks[3]
    }

    #[inline]
    pub fn right_mouth(&self) -> Point {
        self.landmarks[4]
    }
}

/// Decodes the detector's raw tensor into accepted detections, in the model canvas frame.
///
/// Rejects tensors whose length isn't exactly `NUM_ROWS * ROW_LEN`, rather than trusting the
/// external process that produced them.
pub fn decode_detections(tensor: &[f32]) -> Result<Vec<FaceDetection>> {
    let expected = NUM_ROWS * ROW_LEN;
    if tensor.len() != expected {
        return Err(Error::MalformedDetectorOutput {
            expected,
            actual: tensor.len(),
        });
    }

    let mut out = Vec::new();
    for row in tensor.chunks_exact(ROW_LEN) {
        let score = row[4];
        if score < SCORE_THRESHOLD {
            continue;
        }

        let (xc, yc, w, h) = (row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64);
        let bbox = Rect::new(xc - w / 2.0, yc - h / 2.0, w, h);

        let landmarks = [
            Point::new(row[5] as f64, row[6] as f64),
            Point::new(row[7] as f64, row[8] as f64),
            Point::new(row[9] as f64, row[10] as f64),
            Point::new(row[11] as f64, row[12] as f64),
            Point::new(row[13] as f64, row[14] as f64),
        ];

        log::trace!("accepted detection: score={score:.3} bbox={bbox}");
        out.push(FaceDetection {
            bbox,
            score,
            landmarks,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(score: f32) -> [f32; ROW_LEN] {
        [
            100.0, 100.0, 20.0, 30.0, score, 90.0, 90.0, 110.0, 90.0, 100.0, 100.0, 92.0, 115.0,
            108.0, 115.0, 0.0,
        ]
    }

    #[test]
    fn rejects_wrong_length() {
        let err = decode_detections(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, Error::MalformedDetectorOutput { .. }));
    }

    #[test]
    fn filters_by_score_threshold() {
        let mut tensor = vec![0.0f32; NUM_ROWS * ROW_LEN];
        tensor[0..ROW_LEN].copy_from_slice(&row(0.69));
        tensor[ROW_LEN..2 * ROW_LEN].copy_from_slice(&row(0.7));
        tensor[2 * ROW_LEN..3 * ROW_LEN].copy_from_slice(&row(0.95));

        let detections = decode_detections(&tensor).unwrap();
        assert_eq!(detections.len(), 2);
        assert!(detections.iter().all(|d| d.score >= SCORE_THRESHOLD));
    }

    #[test]
    fn converts_center_to_top_left() {
        let mut tensor = vec![0.0f32; NUM_ROWS * ROW_LEN];
        tensor[0..ROW_LEN].copy_from_slice(&row(0.9));

        let detections = decode_detections(&tensor).unwrap();
        let bbox = detections[0].bbox;
        assert_eq!(bbox, Rect::new(90.0, 85.0, 20.0, 30.0));
    }

    #[test]
    fn preserves_row_order_among_accepted() {
        let mut tensor = vec![0.0f32; NUM_ROWS * ROW_LEN];
        tensor[ROW_LEN..2 * ROW_LEN].copy_from_slice(&row(0.8));
        tensor[5 * ROW_LEN..6 * ROW_LEN].copy_from_slice(&row(0.75));

        let detections = decode_detections(&tensor).unwrap();
        assert_eq!(detections.len(), 2);
        assert!((detections[0].score - 0.8).abs() < 1e-6);
        assert!((detections[1].score - 0.75).abs() < 1e-6);
    }
}
