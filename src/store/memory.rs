//! In-memory Animation Store, for tests and ephemeral runs.

use crate::error::StorageError;
use crate::metadata::Metadata;
use crate::store::{AnimationStore, StoredFrame};
use crate::types::FrameId;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryAnimationStore {
    metadata: RwLock<Vec<Metadata>>,
    frames: RwLock<HashMap<FrameId, StoredFrame>>,
}

impl MemoryAnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.read().len()
    }

    pub fn stored_frame(&self, frame_id: &FrameId) -> Option<StoredFrame> {
        self.frames.read().get(frame_id).cloned()
    }
}

impl AnimationStore for MemoryAnimationStore {
    fn fetch_metadata_array(&self) -> Result<Vec<Metadata>, StorageError> {
        Ok(self.metadata.read().clone())
    }

    fn replace_metadata_array(&self, metadata: &[Metadata]) -> Result<(), StorageError> {
        *self.metadata.write() = metadata.to_vec();
        Ok(())
    }

    fn fetch_frame(&self, frame_id: &FrameId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.frames.read().get(frame_id).map(|f| f.data.clone()))
    }

    fn insert_frame(
        &self,
        animation_id: &str,
        frame_id: &FrameId,
        data: &[u8],
    ) -> Result<(), StorageError> {
        self.frames.write().insert(
            frame_id.clone(),
            StoredFrame {
                animation_id: animation_id.to_string(),
                data: data.to_vec(),
            },
        );
        Ok(())
    }
}
