//! Pixel Buffers
//!
//! A frame's pixels exist in three shapes: the flat row-major byte buffer that is
//! stored and sent over the wire, a 2D grid addressed by `[row][col]`, and the
//! hardware scan order of a serpentine-wired LED matrix. This module owns the
//! flat form; `grid` and `hex` convert between the others.

pub mod grid;
pub mod hex;

pub use self::grid::{from_grid, reverse_alternate_columns, to_grid, Grid};
pub use self::hex::{parse_hex, to_hex};

use crate::error::CodecError;
use crate::types::{CHANNELS, FRAME_BYTE_LENGTH, FRAME_PIXEL_COUNT};
use serde::{Deserialize, Serialize};

/// One pixel: red, green, blue.
pub type Rgb = [u8; CHANNELS];

/// Flat RGB buffer of exactly `FRAME_BYTE_LENGTH` bytes.
///
/// The length is checked on every construction path, serde included, so a
/// `PixelBuffer` in hand is always a full frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PixelBuffer(Vec<u8>);

impl PixelBuffer {
    /// An all-black frame.
    pub fn blank() -> Self {
        PixelBuffer(vec![0u8; FRAME_BYTE_LENGTH])
    }

    /// Build a frame from exactly `FRAME_PIXEL_COUNT` pixels.
    pub fn from_pixels(pixels: &[Rgb]) -> Result<Self, CodecError> {
        if pixels.len() != FRAME_PIXEL_COUNT {
            return Err(CodecError::invalid_length(
                format!("{} pixels", FRAME_PIXEL_COUNT),
                pixels.len(),
            ));
        }
        Ok(PixelBuffer(pixels.iter().flatten().copied().collect()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        let start = index.checked_mul(CHANNELS)?;
        let chunk = self.0.get(start..start + CHANNELS)?;
        Some([chunk[0], chunk[1], chunk[2]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.0.chunks_exact(CHANNELS).map(|c| [c[0], c[1], c[2]])
    }

    pub fn grid(&self) -> Grid {
        grid::fill_grid(&self.0)
    }

    /// Bytes in the order a serpentine-wired matrix consumes them.
    pub fn hardware_order(&self) -> Vec<u8> {
        from_grid(&reverse_alternate_columns(self.grid())).into_bytes()
    }
}

impl TryFrom<Vec<u8>> for PixelBuffer {
    type Error = CodecError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() != FRAME_BYTE_LENGTH {
            return Err(CodecError::invalid_length(
                format!("{} bytes", FRAME_BYTE_LENGTH),
                bytes.len(),
            ));
        }
        Ok(PixelBuffer(bytes))
    }
}

impl TryFrom<&[u8]> for PixelBuffer {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        PixelBuffer::try_from(bytes.to_vec())
    }
}

impl From<PixelBuffer> for Vec<u8> {
    fn from(buffer: PixelBuffer) -> Self {
        buffer.0
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
