//! Persistence layer for the Animation Store

use crate::error::StorageError;
use crate::metadata::Metadata;
use crate::store::{AnimationStore, StoredFrame};
use crate::types::FrameId;
use bincode;
use sled;
use std::path::Path;
use tracing::debug;

const METADATA_TREE: &str = "metadata";
const FRAMES_TREE: &str = "frames";
const METADATA_KEY: &[u8] = b"animations";

/// Sled-based implementation of AnimationStore
///
/// Metadata lives as one bincode document in the `metadata` tree; frames are
/// bincode `StoredFrame` records in the `frames` tree keyed by frame ID.
pub struct SledAnimationStore {
    db: sled::Db,
    metadata: sled::Tree,
    frames: sled::Tree,
}

impl SledAnimationStore {
    /// Open (or create) a store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Backend(format!(
                "Failed to open sled database at {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_db(db)
    }

    /// Wrap an already-open database.
    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let metadata = db.open_tree(METADATA_TREE)?;
        let frames = db.open_tree(FRAMES_TREE)?;
        Ok(Self {
            db,
            metadata,
            frames,
        })
    }

    /// Number of stored frame records, including ones no metadata references.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl AnimationStore for SledAnimationStore {
    fn fetch_metadata_array(&self) -> Result<Vec<Metadata>, StorageError> {
        match self.metadata.get(METADATA_KEY)? {
            Some(value) => Ok(bincode::deserialize(&value)?),
            None => Ok(Vec::new()),
        }
    }

    fn replace_metadata_array(&self, metadata: &[Metadata]) -> Result<(), StorageError> {
        let value = bincode::serialize(metadata)?;
        self.metadata.insert(METADATA_KEY, value)?;
        Ok(())
    }

    fn fetch_frame(&self, frame_id: &FrameId) -> Result<Option<Vec<u8>>, StorageError> {
        match self.frames.get(frame_id.as_str().as_bytes())? {
            Some(value) => {
                let record: StoredFrame = bincode::deserialize(&value)?;
                Ok(Some(record.data))
            }
            None => Ok(None),
        }
    }

    fn insert_frame(
        &self,
        animation_id: &str,
        frame_id: &FrameId,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let record = StoredFrame {
            animation_id: animation_id.to_string(),
            data: data.to_vec(),
        };
        let value = bincode::serialize(&record)?;
        self.frames.insert(frame_id.as_str().as_bytes(), value)?;
        debug!(frame_id = %frame_id, animation_id, "Stored frame");
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        SledAnimationStore::flush(self)
    }
}
