//! Frame-order invariants shared by every cache boundary.

use crate::metadata::Metadata;
use crate::types::FrameId;
use std::collections::HashSet;

/// A broken metadata invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    pub frame_id: Option<FrameId>,
    pub reason: String,
}

/// Check `total_frames`, frame-id length, and frame-order uniqueness.
pub fn check_metadata(metadata: &Metadata, id_length: usize) -> Result<(), OrderViolation> {
    if metadata.total_frames != metadata.frame_order.len() {
        return Err(OrderViolation {
            frame_id: None,
            reason: format!(
                "totalFrames is {} but frameOrder lists {} frames",
                metadata.total_frames,
                metadata.frame_order.len()
            ),
        });
    }

    let mut seen = HashSet::with_capacity(metadata.frame_order.len());
    for frame_id in &metadata.frame_order {
        if !frame_id.has_length(id_length) {
            return Err(OrderViolation {
                frame_id: Some(frame_id.clone()),
                reason: format!("frame id {} is not {} characters long", frame_id, id_length),
            });
        }
        if !seen.insert(frame_id) {
            return Err(OrderViolation {
                frame_id: Some(frame_id.clone()),
                reason: format!("frame id {} appears twice in frameOrder", frame_id),
            });
        }
    }

    Ok(())
}

impl Metadata {
    /// See [`check_metadata`].
    pub fn check(&self, id_length: usize) -> Result<(), OrderViolation> {
        check_metadata(self, id_length)
    }
}
