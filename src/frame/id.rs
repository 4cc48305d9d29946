//! Frame identifier generation
//!
//! Identifiers are short random strings, not content hashes. Uniqueness is the
//! caller's job: whoever uses a generated value as a key re-checks it against
//! the keys already in use.

use crate::error::CodecError;
use crate::types::FrameId;
use rand::Rng;

/// Lowercase hexadecimal alphabet used for frame identifiers.
pub const HEX_ALPHABET: &[u8] = b"0123456789abcdef";

/// Draw `length` symbols independently and uniformly from `alphabet`.
///
/// Not cryptographically secure.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    alphabet: &[u8],
    length: usize,
) -> Result<String, CodecError> {
    if length < 1 {
        return Err(CodecError::InvalidArgument(
            "identifier length must be at least 1".to_string(),
        ));
    }
    if alphabet.is_empty() {
        return Err(CodecError::InvalidArgument(
            "identifier alphabet must not be empty".to_string(),
        ));
    }

    Ok((0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect())
}

/// Generate a random hexadecimal identifier of `length` characters.
pub fn generate(length: usize) -> Result<String, CodecError> {
    generate_with(&mut rand::thread_rng(), HEX_ALPHABET, length)
}

/// Generate a frame identifier of `length` hex digits.
pub fn generate_frame_id<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Result<FrameId, CodecError> {
    generate_with(rng, HEX_ALPHABET, length).map(FrameId::from_generated)
}
