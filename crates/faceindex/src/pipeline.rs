//! The pipeline orchestrator (C8): `index_faces`, the crate's single public entry point.

use faceindex_geom::{Dimensions, PixelBuffer};
use faceindex_utils::timer::Timer;

use crate::align;
use crate::blur;
use crate::detection::{self, FaceDetection};
use crate::error::{Error, Result};
use crate::faceid;
use crate::remap;
use crate::types::{Face, FaceIndex, EMBEDDING_DIM};
use crate::warp::{self, CHANNELS, FACE_SIZE};

/// Faces are aligned, warped, and embedded in batches of this size, bounding peak memory and the
/// duration of any single embedder call.
pub const BATCH_SIZE: usize = 50;

/// The external collaborator that runs the detector and embedder models.
///
/// Modeled as a synchronous, fallible trait rather than `async fn`: the core is single-threaded
/// cooperative and suspends only at these two calls, matching the rest of this component family's
/// treatment of inference as a blocking call dispatched from a dedicated thread.
pub trait InferenceWorker {
    /// Runs the face detector over a raw RGBA buffer of the given `(height, width, channels)`
    /// shape, returning the flat `25200 * 16` tensor described in [`crate::detection`].
    fn detect_faces(&self, pixel_rgba: &[u8], shape: (u32, u32, u32)) -> anyhow::Result<Vec<f32>>;

    /// Runs the embedding model over a batch of aligned face crops (`N * 112 * 112 * 3` floats),
    /// returning `N * 192` embedding floats.
    fn compute_face_embeddings(&self, aligned_faces: &[f32]) -> anyhow::Result<Vec<f32>>;
}

struct PendingFace {
    face_id: String,
    detection: FaceDetection,
    alignment: align::FaceAlignment,
}

/// Indexes every face in one image: detects, aligns, warps, embeds, and scores each one, and
/// returns them as a single immutable [`FaceIndex`] with coordinates normalized to `[0, 1]`.
///
/// Any step failure aborts the whole invocation and returns no partial result, except a
/// [`Error::DegenerateAlignment`] fit, which drops only the affected face and continues indexing
/// the rest of the image.
pub fn index_faces(
    worker: &dyn InferenceWorker,
    file_id: i64,
    pixel_rgba: Vec<u8>,
    dims: Dimensions,
) -> Result<FaceIndex> {
    let pixel_buffer =
        PixelBuffer::from_raw(dims.width, dims.height, pixel_rgba).map_err(Error::InvalidPixelBuffer)?;

    log::debug!("index_faces: {}x{} image, file_id={file_id}", dims.width, dims.height);

    let mut t_detect = Timer::new("detect");
    let tensor = t_detect
        .time(|| worker.detect_faces(pixel_buffer.as_bytes(), (dims.height, dims.width, 4)))
        .map_err(Error::InferenceError)?;
    log::trace!("{t_detect}");
    let canvas_detections = detection::decode_detections(&tensor)?;
    log::debug!("decoded {} candidate detections", canvas_detections.len());

    let to_source = remap::canvas_to_source(dims);
    let source_detections: Vec<FaceDetection> =
        canvas_detections.iter().map(|d| to_source.detection(d)).collect();

    let mut pending = Vec::with_capacity(source_detections.len());
    for detection in source_detections {
        let face_id = faceid::make_face_id(file_id, detection.bbox, dims);
        match align::fit(&detection) {
            Ok(alignment) => pending.push(PendingFace {
                face_id,
                detection,
                alignment,
            }),
            Err(Error::DegenerateAlignment) => {
                log::warn!("dropping face {face_id}: degenerate alignment fit");
            }
            Err(other) => return Err(other),
        }
    }

    let mut t_warp = Timer::new("warp");
    let mut t_embed = Timer::new("embed");
    let mut faces = Vec::with_capacity(pending.len());
    for batch in pending.chunks(BATCH_SIZE) {
        log::trace!("processing batch of {} faces", batch.len());
        let alignments: Vec<align::FaceAlignment> = batch.iter().map(|p| p.alignment).collect();
        let warped = t_warp.time(|| warp::warp_batch(&pixel_buffer, &alignments))?;

        let embeddings = t_embed
            .time(|| worker.compute_face_embeddings(&warped))
            .map_err(Error::InferenceError)?;
        let expected_len = batch.len() * EMBEDDING_DIM;
        if embeddings.len() != expected_len {
            return Err(Error::InferenceError(anyhow::anyhow!(
                "embedder returned {} floats, expected {expected_len} for a batch of {}",
                embeddings.len(),
                batch.len()
            )));
        }

        let crop_len = FACE_SIZE * FACE_SIZE * CHANNELS;
        for (i, pending_face) in batch.iter().enumerate() {
            let crop = &warped[i * crop_len..(i + 1) * crop_len];
            let direction = blur::face_direction(&pending_face.detection);
            let blur_score = blur::compute_blur(crop, direction);
            let embedding = embeddings[i * EMBEDDING_DIM..(i + 1) * EMBEDDING_DIM].to_vec();

            let normalized = FaceDetection {
                bbox: pending_face.detection.bbox.normalize_by(dims),
                score: pending_face.detection.score,
                landmarks: pending_face.detection.landmarks.map(|p| p.normalize_by(dims)),
            };

            faces.push(Face {
                face_id: pending_face.face_id.clone(),
                detection: normalized,
                score: pending_face.detection.score,
                blur: blur_score,
                embedding,
            });
        }
    }

    log::trace!("{t_warp}");
    log::trace!("{t_embed}");
    log::debug!("index_faces: produced {} faces", faces.len());
    Ok(FaceIndex {
        width: dims.width,
        height: dims.height,
        faces,
    })
}
