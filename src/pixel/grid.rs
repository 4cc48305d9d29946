//! Flat buffer <-> 2D grid conversions and the serpentine scan correction.

use crate::error::CodecError;
use crate::pixel::{PixelBuffer, Rgb};
use crate::types::{CHANNELS, FRAME_BYTE_LENGTH, IMAGE_PIXEL_LENGTH};

/// Pixels addressed as `grid[row][col]`.
pub type Grid = [[Rgb; IMAGE_PIXEL_LENGTH]; IMAGE_PIXEL_LENGTH];

/// Lay a flat row-major buffer out as a grid.
///
/// The triplet starting at `3 * (row * 16 + col)` becomes `grid[row][col]`.
pub fn to_grid(flat: &[u8]) -> Result<Grid, CodecError> {
    if flat.len() != FRAME_BYTE_LENGTH {
        return Err(CodecError::invalid_length(
            format!("{} bytes", FRAME_BYTE_LENGTH),
            flat.len(),
        ));
    }
    Ok(fill_grid(flat))
}

/// Caller guarantees `flat.len() == FRAME_BYTE_LENGTH`.
pub(crate) fn fill_grid(flat: &[u8]) -> Grid {
    let mut grid = [[[0u8; CHANNELS]; IMAGE_PIXEL_LENGTH]; IMAGE_PIXEL_LENGTH];
    for (index, chunk) in flat.chunks_exact(CHANNELS).enumerate() {
        let row = index / IMAGE_PIXEL_LENGTH;
        let col = index % IMAGE_PIXEL_LENGTH;
        grid[row][col] = [chunk[0], chunk[1], chunk[2]];
    }
    grid
}

/// Flatten a grid back to row-major bytes.
pub fn from_grid(grid: &Grid) -> PixelBuffer {
    let bytes: Vec<u8> = grid.iter().flatten().flatten().copied().collect();
    // A Grid is fixed-size, so the byte count always matches.
    PixelBuffer(bytes)
}

/// Reverse the row order of every odd column.
///
/// A serpentine matrix runs even columns top-to-bottom and odd columns
/// bottom-to-top. Applying this twice yields the original grid.
pub fn reverse_alternate_columns(mut grid: Grid) -> Grid {
    let n = IMAGE_PIXEL_LENGTH;
    for col in (1..n).step_by(2) {
        for row in 0..n / 2 {
            let top = grid[row][col];
            grid[row][col] = grid[n - 1 - row][col];
            grid[n - 1 - row][col] = top;
        }
    }
    grid
}
