//! Serialization envelopes around [`FaceIndex`] (C12, ambient).
//!
//! These carry no behavior beyond field access: persistence and transport remain the caller's
//! responsibility, the way every other serialized record in this family of codebases separates
//! the data shape from the I/O that moves it.

use serde::{Deserialize, Serialize};

use crate::types::FaceIndex;

/// The pipeline version stamped onto every [`RemoteFaceIndex`].
///
/// Tied to the fixed geometry/constants contract in this crate; bump it (and the constants that
/// define it) together when either changes, not independently.
pub const PIPELINE_VERSION: u32 = 1;

/// A [`FaceIndex`] paired with the local database primary key it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFaceIndex {
    pub file_id: i64,
    #[serde(flatten)]
    pub index: FaceIndex,
}

impl LocalFaceIndex {
    pub fn new(file_id: i64, index: FaceIndex) -> Self {
        Self { file_id, index }
    }
}

/// A [`FaceIndex`] tagged with the pipeline version and a user-agent-like client identifier, for
/// transport to remote storage.
///
/// Remote consumers with a strictly newer supported version must ignore older-version indices,
/// which causes the producing client to reindex locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFaceIndex {
    pub version: u32,
    pub client: String,
    #[serde(flatten)]
    pub index: FaceIndex,
}

impl RemoteFaceIndex {
    /// Wraps `index`, stamping the current [`PIPELINE_VERSION`].
    pub fn new(index: FaceIndex, client: impl Into<String>) -> Self {
        Self {
            version: PIPELINE_VERSION,
            client: client.into(),
            index,
        }
    }
}
