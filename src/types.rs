//! Shared constants and identifier types.
//!
//! Every frame-size check in the crate goes through the constants defined here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the square pixel matrix.
pub const IMAGE_PIXEL_LENGTH: usize = 16;

/// Number of pixels in one frame.
pub const FRAME_PIXEL_COUNT: usize = IMAGE_PIXEL_LENGTH * IMAGE_PIXEL_LENGTH;

/// Colour channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Byte length of one stored frame.
pub const FRAME_BYTE_LENGTH: usize = FRAME_PIXEL_COUNT * CHANNELS;

/// Default length of generated frame identifiers.
pub const DEFAULT_FRAME_ID_LENGTH: usize = 6;

/// Frame identifier: a fixed-length lowercase hexadecimal string.
///
/// The length is a runtime setting, so `FrameId` itself only guarantees the
/// alphabet; [`FrameId::has_length`] is checked wherever the configured length
/// matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameId(String);

impl FrameId {
    /// Parse an identifier, requiring exactly `length` hex digits.
    pub fn parse(raw: &str, length: usize) -> Result<Self, crate::error::CodecError> {
        if raw.len() != length {
            return Err(crate::error::CodecError::InvalidArgument(format!(
                "frame id {:?} must have {} characters, got {}",
                raw,
                length,
                raw.len()
            )));
        }
        check_alphabet(raw)?;
        Ok(FrameId(raw.to_string()))
    }

    pub(crate) fn from_generated(raw: String) -> Self {
        FrameId(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_length(&self, length: usize) -> bool {
        self.0.len() == length
    }
}

fn check_alphabet(raw: &str) -> Result<(), crate::error::CodecError> {
    if raw.is_empty() || !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(crate::error::CodecError::InvalidArgument(format!(
            "frame id {:?} is not lowercase hexadecimal",
            raw
        )));
    }
    Ok(())
}

/// Deserialized IDs (stored metadata, metadata responses) get the alphabet
/// check; the length is left to [`FrameId::has_length`].
impl TryFrom<String> for FrameId {
    type Error = crate::error::CodecError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        check_alphabet(&raw)?;
        Ok(FrameId(raw))
    }
}

impl From<FrameId> for String {
    fn from(id: FrameId) -> Self {
        id.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FrameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
