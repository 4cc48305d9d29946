//! `#rrggbb` colour strings.

use crate::error::CodecError;
use crate::pixel::Rgb;
use crate::types::CHANNELS;

/// Render every RGB triplet of `flat` as a lowercase `#rrggbb` string.
pub fn to_hex(flat: &[u8]) -> Result<Vec<String>, CodecError> {
    if flat.len() % CHANNELS != 0 {
        return Err(CodecError::invalid_length(
            format!("a multiple of {}", CHANNELS),
            flat.len(),
        ));
    }
    Ok(flat
        .chunks_exact(CHANNELS)
        .map(|rgb| format!("#{}", ::hex::encode(rgb)))
        .collect())
}

/// Parse one `#rrggbb` string (case-insensitive).
pub fn parse_hex(colour: &str) -> Result<Rgb, CodecError> {
    let digits = colour.strip_prefix('#').ok_or_else(|| {
        CodecError::InvalidArgument(format!("colour {:?} must start with '#'", colour))
    })?;
    let mut rgb = [0u8; CHANNELS];
    ::hex::decode_to_slice(digits, &mut rgb)
        .map_err(|e| CodecError::InvalidArgument(format!("colour {:?}: {}", colour, e)))?;
    Ok(rgb)
}
