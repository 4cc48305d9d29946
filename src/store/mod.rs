//! Animation Store
//!
//! The persisted side of the cache: one metadata document holding every
//! animation in display order, plus one record per frame keyed by frame ID.
//! The synchronization engine treats it as a plain key-value collaborator.

pub mod memory;
pub mod persistence;

pub use memory::MemoryAnimationStore;
pub use persistence::SledAnimationStore;

use crate::error::StorageError;
use crate::metadata::Metadata;
use crate::types::FrameId;
use serde::{Deserialize, Serialize};

/// Persisted frame record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFrame {
    pub animation_id: String,
    pub data: Vec<u8>,
}

/// Animation Store interface
pub trait AnimationStore {
    /// All metadata, in display order. Empty when nothing has been saved yet.
    fn fetch_metadata_array(&self) -> Result<Vec<Metadata>, StorageError>;

    /// Replace the whole metadata collection.
    fn replace_metadata_array(&self, metadata: &[Metadata]) -> Result<(), StorageError>;

    /// Raw frame bytes, or `None` if no frame is stored under `frame_id`.
    fn fetch_frame(&self, frame_id: &FrameId) -> Result<Option<Vec<u8>>, StorageError>;

    /// Insert or overwrite one frame.
    fn insert_frame(
        &self,
        animation_id: &str,
        frame_id: &FrameId,
        data: &[u8],
    ) -> Result<(), StorageError>;

    /// Make every write so far durable.
    ///
    /// Writes above may sit in a buffer until this returns; stores that write
    /// through keep the default.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
