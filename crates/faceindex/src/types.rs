//! The public data model: [`Face`] and [`FaceIndex`].

use serde::{Deserialize, Serialize};

use faceindex_geom::Rect;

use crate::detection::FaceDetection;

/// Expected embedding length for the pipeline's bundled embedding model.
pub const EMBEDDING_DIM: usize = 192;

/// One detected, aligned, and scored face.
///
/// `detection` is normalized to `[0, 1]` by the source image's dimensions; `embedding` always has
/// length [`EMBEDDING_DIM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub face_id: String,
    pub detection: FaceDetection,
    pub score: f32,
    pub blur: f64,
    pub embedding: Vec<f32>,
}

/// The per-image record produced by indexing: source dimensions plus every face found, in the
/// order the detector emitted them after score filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceIndex {
    pub width: u32,
    pub height: u32,
    pub faces: Vec<Face>,
}
