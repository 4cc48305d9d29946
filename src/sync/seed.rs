//! Seed animations written to an empty store on first start.

use crate::pixel::{PixelBuffer, Rgb};
use crate::types::{FRAME_PIXEL_COUNT, IMAGE_PIXEL_LENGTH};
use crate::validation::ValidatedAnimation;

const SWEEP_COLOURS: [Rgb; 4] = [[255, 0, 0], [255, 160, 0], [0, 200, 80], [0, 90, 255]];

/// Two demo animations: a colour bar sweeping left to right, and a blinking
/// checkerboard that loops forever under the default repeat sentinel.
pub fn seed_animations() -> Vec<ValidatedAnimation> {
    vec![
        ValidatedAnimation {
            animation_id: "sweep".to_string(),
            frame_duration: 120,
            repeat_count: 3,
            frames: (0..IMAGE_PIXEL_LENGTH / 2).map(sweep_frame).collect(),
        },
        ValidatedAnimation {
            animation_id: "checkerboard".to_string(),
            frame_duration: 500,
            repeat_count: 0,
            frames: vec![checker_frame(false), checker_frame(true)],
        },
    ]
}

fn sweep_frame(step: usize) -> PixelBuffer {
    let colour = SWEEP_COLOURS[step % SWEEP_COLOURS.len()];
    let pixels: Vec<Rgb> = (0..FRAME_PIXEL_COUNT)
        .map(|i| {
            let col = i % IMAGE_PIXEL_LENGTH;
            if col / 2 == step {
                colour
            } else {
                [0, 0, 0]
            }
        })
        .collect();
    to_buffer(&pixels)
}

fn checker_frame(inverted: bool) -> PixelBuffer {
    let pixels: Vec<Rgb> = (0..FRAME_PIXEL_COUNT)
        .map(|i| {
            let (row, col) = (i / IMAGE_PIXEL_LENGTH, i % IMAGE_PIXEL_LENGTH);
            if ((row + col) % 2 == 0) != inverted {
                [255, 255, 255]
            } else {
                [0, 0, 0]
            }
        })
        .collect();
    to_buffer(&pixels)
}

fn to_buffer(pixels: &[Rgb]) -> PixelBuffer {
    // Every generator above yields exactly FRAME_PIXEL_COUNT pixels.
    PixelBuffer::from_pixels(pixels).unwrap_or_else(|_| PixelBuffer::blank())
}
