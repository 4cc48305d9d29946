//! Client Payload Validation
//!
//! Every client upload passes through here before it may touch the cache. The
//! input keeps each field as loose JSON so that a missing field can be told
//! apart from `0` or `""`; the output is fully typed, with each frame already
//! expanded to a [`PixelBuffer`]. Validation stops at the first failure and
//! the whole batch is rejected.

use crate::error::ValidationError;
use crate::pixel::{parse_hex, PixelBuffer, Rgb};
use crate::types::{CHANNELS, FRAME_PIXEL_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const FIELD_ANIMATION_ID: &str = "animationID";
pub const FIELD_FRAME_DURATION: &str = "frameDuration";
pub const FIELD_REPEAT_COUNT: &str = "repeatCount";
pub const FIELD_FRAMES: &str = "frames";

/// One animation as sent by a client, before validation.
///
/// Unknown fields (client-chosen frame IDs, UI state) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientAnimation {
    #[serde(rename = "animationID", default, skip_serializing_if = "Option::is_none")]
    pub animation_id: Option<Value>,

    #[serde(rename = "frameDuration", default, skip_serializing_if = "Option::is_none")]
    pub frame_duration: Option<Value>,

    #[serde(rename = "repeatCount", default, skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Value>,
}

/// An animation that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnimation {
    pub animation_id: String,
    pub frame_duration: u32,
    pub repeat_count: u32,
    pub frames: Vec<PixelBuffer>,
}

/// Split a raw upload document into animation entries.
///
/// The document must be an array whose entries are all non-null objects.
pub fn parse_entries(document: Value) -> Result<Vec<ClientAnimation>, ValidationError> {
    let entries = match document {
        Value::Array(entries) => entries,
        other => {
            return Err(ValidationError::payload(
                "metadata",
                format!("expected an array of animations, got {}", kind(&other)),
            ))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(_) => serde_json::from_value(entry)
                .map_err(|e| ValidationError::animation(index, "entry", e.to_string())),
            other => Err(ValidationError::animation(
                index,
                "entry",
                format!("expected an object, got {}", kind(&other)),
            )),
        })
        .collect()
}

/// Validate a full upload. Nothing is returned unless every entry is valid.
pub fn validate_animations(
    animations: &[ClientAnimation],
) -> Result<Vec<ValidatedAnimation>, ValidationError> {
    let mut seen_ids = HashSet::new();
    let mut validated = Vec::with_capacity(animations.len());

    for (index, animation) in animations.iter().enumerate() {
        let checked = validate_animation(index, animation)?;
        if !seen_ids.insert(checked.animation_id.clone()) {
            return Err(ValidationError::animation(
                index,
                FIELD_ANIMATION_ID,
                format!("duplicate animation id {:?}", checked.animation_id),
            ));
        }
        validated.push(checked);
    }

    Ok(validated)
}

/// Validate one entry; `index` is its position in the upload.
pub fn validate_animation(
    index: usize,
    animation: &ClientAnimation,
) -> Result<ValidatedAnimation, ValidationError> {
    let animation_id = required(index, FIELD_ANIMATION_ID, &animation.animation_id)?;
    let frame_duration = required(index, FIELD_FRAME_DURATION, &animation.frame_duration)?;
    let repeat_count = required(index, FIELD_REPEAT_COUNT, &animation.repeat_count)?;
    let frames = required(index, FIELD_FRAMES, &animation.frames)?;

    let animation_id = match animation_id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(ValidationError::animation(
                index,
                FIELD_ANIMATION_ID,
                format!("expected a string, got {}", kind(other)),
            ))
        }
    };

    let frame_duration = as_u32(index, FIELD_FRAME_DURATION, frame_duration)?;
    if frame_duration == 0 {
        return Err(ValidationError::animation(
            index,
            FIELD_FRAME_DURATION,
            "must be positive",
        ));
    }
    let repeat_count = as_u32(index, FIELD_REPEAT_COUNT, repeat_count)?;

    let frames = match frames {
        Value::Array(frames) => frames,
        other => {
            return Err(ValidationError::animation(
                index,
                FIELD_FRAMES,
                format!("expected an array, got {}", kind(other)),
            ))
        }
    };
    if frames.is_empty() {
        return Err(ValidationError::animation(
            index,
            FIELD_FRAMES,
            "must contain at least one frame",
        ));
    }

    let frames = frames
        .iter()
        .enumerate()
        .map(|(frame_index, frame)| validate_frame(index, frame_index, frame))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedAnimation {
        animation_id,
        frame_duration,
        repeat_count,
        frames,
    })
}

/// Check one frame and expand it to channel bytes.
///
/// A frame is a dense object keyed `"0"`..`"255"` or a plain array; either way
/// it must hold exactly one entry per pixel. The count is checked before any
/// pixel is expanded. An entry is `[r, g, b]`, `"#rrggbb"`, or a bare integer
/// in `[0,255]`, which stands for the grey `[v, v, v]`.
pub fn validate_frame(
    animation: usize,
    frame_index: usize,
    frame: &Value,
) -> Result<PixelBuffer, ValidationError> {
    let entries: Vec<&Value> = match frame {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => dense_entries(map)
            .map_err(|reason| ValidationError::frame(animation, frame_index, FIELD_FRAMES, reason))?,
        other => {
            return Err(ValidationError::frame(
                animation,
                frame_index,
                FIELD_FRAMES,
                format!("expected an object or array, got {}", kind(other)),
            ))
        }
    };

    if entries.len() != FRAME_PIXEL_COUNT {
        return Err(ValidationError::frame(
            animation,
            frame_index,
            FIELD_FRAMES,
            format!("expected {} pixels, got {}", FRAME_PIXEL_COUNT, entries.len()),
        ));
    }

    let pixels = entries
        .iter()
        .enumerate()
        .map(|(pixel, value)| {
            parse_pixel(value).map_err(|reason| {
                ValidationError::frame(
                    animation,
                    frame_index,
                    FIELD_FRAMES,
                    format!("pixel {}: {}", pixel, reason),
                )
            })
        })
        .collect::<Result<Vec<Rgb>, _>>()?;

    PixelBuffer::from_pixels(&pixels)
        .map_err(|e| ValidationError::frame(animation, frame_index, FIELD_FRAMES, e.to_string()))
}

fn required<'a>(
    index: usize,
    field: &str,
    value: &'a Option<Value>,
) -> Result<&'a Value, ValidationError> {
    value
        .as_ref()
        .ok_or_else(|| ValidationError::animation(index, field, "is required"))
}

fn as_u32(index: usize, field: &str, value: &Value) -> Result<u32, ValidationError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            ValidationError::animation(
                index,
                field,
                format!("expected a non-negative integer, got {}", value),
            )
        })
}

/// Order the values of a `{"0": .., "1": ..}` object by index.
fn dense_entries(map: &Map<String, Value>) -> Result<Vec<&Value>, String> {
    (0..map.len())
        .map(|i| {
            map.get(&i.to_string())
                .ok_or_else(|| format!("frame object is not dense: missing index {}", i))
        })
        .collect()
}

fn parse_pixel(value: &Value) -> Result<Rgb, String> {
    match value {
        Value::String(colour) => parse_hex(colour).map_err(|e| e.to_string()),
        Value::Array(channels) => {
            if channels.len() != CHANNELS {
                return Err(format!(
                    "expected {} channels, got {}",
                    CHANNELS,
                    channels.len()
                ));
            }
            let mut rgb = [0u8; CHANNELS];
            for (slot, channel) in rgb.iter_mut().zip(channels) {
                *slot = channel
                    .as_u64()
                    .and_then(|c| u8::try_from(c).ok())
                    .ok_or_else(|| format!("channel value {} is not an integer in [0,255]", channel))?;
            }
            Ok(rgb)
        }
        Value::Number(level) => level
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .map(|v| [v; CHANNELS])
            .ok_or_else(|| format!("pixel value {} is not an integer in [0,255]", level)),
        other => Err(format!(
            "expected [r, g, b], \"#rrggbb\" or an integer, got {}",
            kind(other)
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
