//! Animation descriptor types.

use crate::types::FrameId;
use serde::{Deserialize, Serialize};

/// Descriptor of one animation: timing, looping, and ordered frame references.
///
/// Field names follow the wire format (`animationID`, `frameOrder`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "animationID")]
    pub animation_id: String,

    /// Display time per frame, milliseconds.
    #[serde(rename = "frameDuration")]
    pub frame_duration: u32,

    #[serde(rename = "repeatCount")]
    pub repeat_count: u32,

    #[serde(rename = "totalFrames")]
    pub total_frames: usize,

    #[serde(rename = "frameOrder")]
    pub frame_order: Vec<FrameId>,
}

/// How many times an animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Forever,
    Times(u32),
}

impl Metadata {
    /// Build metadata whose `total_frames` matches `frame_order`.
    pub fn new(
        animation_id: impl Into<String>,
        frame_duration: u32,
        repeat_count: u32,
        frame_order: Vec<FrameId>,
    ) -> Self {
        Metadata {
            animation_id: animation_id.into(),
            frame_duration,
            repeat_count,
            total_frames: frame_order.len(),
            frame_order,
        }
    }

    /// Interpret `repeat_count`; `sentinel` is the configured "loop forever" value.
    pub fn playback(&self, sentinel: Option<u32>) -> Playback {
        match sentinel {
            Some(s) if s == self.repeat_count => Playback::Forever,
            _ => Playback::Times(self.repeat_count),
        }
    }

    /// Total running time of one pass, milliseconds.
    pub fn cycle_duration_ms(&self) -> u64 {
        self.frame_duration as u64 * self.total_frames as u64
    }
}
