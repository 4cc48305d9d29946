//! Frame presentation: coloured block preview and hex grid.

use crate::error::SyncError;
use crate::pixel::{to_hex, Grid};
use crate::types::IMAGE_PIXEL_LENGTH;
use owo_colors::OwoColorize;

/// Render a grid as two-character cells, one row per line.
///
/// Without colour, lit pixels print as `##` and black ones as `..`.
pub fn format_frame_preview(grid: &Grid, color: bool) -> String {
    let mut output = String::new();
    for row in grid {
        for &[r, g, b] in row {
            if color {
                output.push_str(&"██".truecolor(r, g, b).to_string());
            } else if r == 0 && g == 0 && b == 0 {
                output.push_str("..");
            } else {
                output.push_str("##");
            }
        }
        output.push('\n');
    }
    output.pop();
    output
}

/// `#rrggbb` per pixel, sixteen per line.
pub fn format_frame_hex(bytes: &[u8]) -> Result<String, SyncError> {
    let colours = to_hex(bytes)?;
    Ok(colours
        .chunks(IMAGE_PIXEL_LENGTH)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n"))
}
