//! The typed error taxonomy for the indexing pipeline.
//!
//! Every fallible boundary named by the pipeline surfaces through this one enum so that callers
//! match on variants instead of parsing strings, the way the rest of this crate family treats its
//! public error types.

use thiserror::Error;

/// Errors produced while indexing the faces of a single image.
#[derive(Debug, Error)]
pub enum Error {
    /// The external detector or embedder call failed.
    #[error("inference worker call failed: {0}")]
    InferenceError(#[source] anyhow::Error),

    /// The detector returned a tensor whose length isn't `25200 * 16`.
    #[error("malformed detector output: expected {expected} floats, got {actual}")]
    MalformedDetectorOutput { expected: usize, actual: usize },

    /// The caller-supplied RGBA buffer's length doesn't match `width * height * 4`.
    #[error("invalid pixel buffer: {0}")]
    InvalidPixelBuffer(#[source] anyhow::Error),

    /// The similarity-transform fit is numerically singular (coincident source landmarks).
    ///
    /// Constructed by the aligner but never returned from [`crate::index_faces`]: the
    /// orchestrator catches this variant and drops the affected face instead, per the pipeline's
    /// per-face failure policy.
    #[error("degenerate alignment: source landmarks are numerically coincident")]
    DegenerateAlignment,
}

pub type Result<T> = std::result::Result<T, Error>;
