//! Animation Frames
//!
//! One still image of an animation: a full-size pixel buffer keyed by a
//! server-assigned identifier and tagged with its owning animation.

pub mod id;

use crate::error::CodecError;
use crate::pixel::PixelBuffer;
use crate::types::FrameId;
use serde::{Deserialize, Serialize};

/// Animation frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_id: FrameId,
    pub animation_id: String,
    pub data: PixelBuffer,
}

impl Frame {
    pub fn new(frame_id: FrameId, animation_id: impl Into<String>, data: PixelBuffer) -> Self {
        Frame {
            frame_id,
            animation_id: animation_id.into(),
            data,
        }
    }

    /// Create a frame from raw stored bytes.
    ///
    /// Fails with `InvalidLength` unless `bytes` is exactly one frame long.
    pub fn from_bytes(
        frame_id: FrameId,
        animation_id: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CodecError> {
        Ok(Frame::new(frame_id, animation_id, PixelBuffer::try_from(bytes)?))
    }
}
