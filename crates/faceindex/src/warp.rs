//! Affine warp and bilinear resampling (C5).
//!
//! Builds the fixed-size aligned face crop the embedder expects, sampling the source pixel
//! buffer through the inverse of the fitted similarity transform.

use nalgebra::Vector2;

use faceindex_geom::PixelBuffer;

use crate::align::{FaceAlignment, CROP_SIZE};
use crate::error::{Error, Result};

/// The fixed square size (in pixels) of an aligned face crop.
pub const FACE_SIZE: usize = 112;

/// Number of color channels in the warped output (RGB).
pub const CHANNELS: usize = 3;

/// Warps the region of `source` described by `alignment` into a `FACE_SIZE * FACE_SIZE * 3`
/// row-major RGB buffer, normalized to `[-1.0, 1.0]` per the embedder's input convention.
pub fn warp_face(source: &PixelBuffer, alignment: &FaceAlignment) -> Result<Vec<f32>> {
    // `alignment.rotation_scale`/`translation` map a source pixel onto the unit square (the frame
    // the ideal landmarks were fit in); scaling both by the crop size gives the affine that maps
    // a source pixel directly onto the 112x112 crop, which the inverse warp below operates on.
    let rs = alignment.rotation_scale * CROP_SIZE;
    let tr = alignment.translation * CROP_SIZE;
    let inverse = rs.try_inverse().ok_or(Error::DegenerateAlignment)?;

    let mut out = vec![0.0f32; FACE_SIZE * FACE_SIZE * CHANNELS];
    for v in 0..FACE_SIZE {
        for u in 0..FACE_SIZE {
            let dst = Vector2::new(u as f64 + 0.5, v as f64 + 0.5);
            let src = inverse * (dst - tr);

            let rgb = source.sample_bilinear_rgb(src.x, src.y);
            let idx = (v * FACE_SIZE + u) * CHANNELS;
            for c in 0..CHANNELS {
                out[idx + c] = (rgb[c] / 127.5 - 1.0) as f32;
            }
        }
    }

    log::trace!("warped face: {FACE_SIZE}x{FACE_SIZE}");
    Ok(out)
}

/// Builds the batched input buffer `[batch, F, F, 3]` the embedder expects, for a slice of
/// per-face alignments sampled against a shared source buffer.
pub fn warp_batch(source: &PixelBuffer, alignments: &[FaceAlignment]) -> Result<Vec<f32>> {
    let mut out = Vec::with_capacity(alignments.len() * FACE_SIZE * FACE_SIZE * CHANNELS);
    for alignment in alignments {
        out.extend_from_slice(&warp_face(source, alignment)?);
    }
    Ok(out)
}
