//! Client Transfer Codec
//!
//! Wire representations exchanged with clients:
//!
//! - upload (client -> server): a `metadata` JSON document listing every
//!   animation with its frames inlined as dense `{"0": [r,g,b], ...}` objects,
//!   plus one `application/octet-stream` attachment per frame. Attachment names
//!   are client-side IDs only; the server assigns its own.
//! - metadata read: `{ "metadata": [...] }`.
//! - frame read: the raw frame bytes as `application/octet-stream`.

pub mod multipart;

use crate::error::{CodecError, TransferError};
use crate::frame::Frame;
use crate::metadata::Metadata;
use crate::pixel::PixelBuffer;
use crate::types::{FrameId, FRAME_BYTE_LENGTH};
use crate::validation::{parse_entries, ClientAnimation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const JSON: &str = "application/json";
pub const METADATA_FIELD: &str = "metadata";

/// One binary part of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// A full-replace upload: the metadata document plus per-frame attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    pub metadata: String,
    pub attachments: Vec<Attachment>,
}

impl TransferPayload {
    /// Server-side decode of the metadata document.
    pub fn decode(&self) -> Result<Vec<ClientAnimation>, TransferError> {
        decode_upload(&self.metadata)
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.name == name)
    }
}

/// Body of a metadata read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub metadata: Vec<Metadata>,
}

/// Body and content type of a frame read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameResponse {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Build an upload from metadata and the pixels of every frame it lists.
///
/// Frames are inlined in `frame_order`; a listed frame missing from `frames`
/// is `NotFound`.
pub fn encode_upload(
    metadata: &[Metadata],
    frames: &HashMap<FrameId, PixelBuffer>,
) -> Result<TransferPayload, TransferError> {
    let mut animations = Vec::with_capacity(metadata.len());
    let mut attachments = Vec::new();

    for entry in metadata {
        let mut dense_frames = Vec::with_capacity(entry.frame_order.len());
        for frame_id in &entry.frame_order {
            let pixels = frames
                .get(frame_id)
                .ok_or_else(|| TransferError::NotFound(frame_id.clone()))?;
            dense_frames.push(dense_frame(pixels));
            attachments.push(Attachment {
                name: frame_id.to_string(),
                content_type: OCTET_STREAM.to_string(),
                body: pixels.as_bytes().to_vec(),
            });
        }

        animations.push(ClientAnimation {
            animation_id: Some(Value::String(entry.animation_id.clone())),
            frame_duration: Some(json!(entry.frame_duration)),
            repeat_count: Some(json!(entry.repeat_count)),
            frames: Some(Value::Array(dense_frames)),
        });
    }

    Ok(TransferPayload {
        metadata: serde_json::to_string(&animations)?,
        attachments,
    })
}

/// `{"0": [r,g,b], "1": [r,g,b], ...}`, one entry per pixel.
pub fn dense_frame(pixels: &PixelBuffer) -> Value {
    let map: Map<String, Value> = pixels
        .pixels()
        .enumerate()
        .map(|(i, rgb)| (i.to_string(), json!(rgb)))
        .collect();
    Value::Object(map)
}

/// Server side: parse the `metadata` field of an upload.
///
/// Structural problems (not an array, null entries) are reported here; field
/// and frame checks happen in [`crate::validation::validate_animations`].
pub fn decode_upload(metadata_json: &str) -> Result<Vec<ClientAnimation>, TransferError> {
    let document: Value = serde_json::from_str(metadata_json)?;
    Ok(parse_entries(document)?)
}

pub fn encode_metadata_response(metadata: &[Metadata]) -> Result<String, TransferError> {
    Ok(serde_json::to_string(&json!({ "metadata": metadata }))?)
}

/// Client side: parse a metadata read.
pub fn decode_metadata_response(body: &str) -> Result<Vec<Metadata>, TransferError> {
    let response: MetadataResponse = serde_json::from_str(body)?;
    Ok(response.metadata)
}

pub fn encode_frame_response(frame: &Frame) -> FrameResponse {
    FrameResponse {
        content_type: OCTET_STREAM.to_string(),
        body: frame.data.as_bytes().to_vec(),
    }
}

/// Client side: accept a frame read only if it is declared as raw bytes.
pub fn decode_frame_response(content_type: &str, body: &[u8]) -> Result<PixelBuffer, TransferError> {
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if !media_type.eq_ignore_ascii_case(OCTET_STREAM) {
        return Err(TransferError::UnexpectedContentType {
            expected: OCTET_STREAM.to_string(),
            actual: content_type.to_string(),
        });
    }
    if body.len() != FRAME_BYTE_LENGTH {
        return Err(TransferError::Codec(CodecError::invalid_length(
            format!("{} bytes", FRAME_BYTE_LENGTH),
            body.len(),
        )));
    }
    Ok(PixelBuffer::try_from(body)?)
}
