//! Deterministic per-image face indexing: detection decode, coordinate remapping, similarity
//! alignment, affine warp, blur scoring, and embedding batching behind one external inference
//! interface.
//!
//! [`index_faces`] is the crate's single public entry point; everything else is exposed so a
//! caller can test, mock, or reuse individual stages.

pub mod align;
pub mod blur;
pub mod detection;
pub mod envelope;
pub mod error;
pub mod faceid;
pub mod pipeline;
pub mod remap;
pub mod types;
pub mod warp;

pub use envelope::{LocalFaceIndex, RemoteFaceIndex, PIPELINE_VERSION};
pub use error::{Error, Result};
pub use faceid::{file_id_from_face_id, make_face_id};
pub use pipeline::{index_faces, InferenceWorker};
pub use types::{Face, FaceIndex, EMBEDDING_DIM};
