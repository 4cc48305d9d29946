//! `multipart/form-data` framing for uploads.
//!
//! Only what an upload needs: a `metadata` text part and any number of binary
//! file parts, each with a `Content-Disposition` name and a `Content-Type`.

use crate::error::TransferError;
use crate::transfer::{Attachment, TransferPayload, JSON, METADATA_FIELD, OCTET_STREAM};

const CRLF: &[u8] = b"\r\n";

impl TransferPayload {
    /// Header value announcing this framing.
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={}", boundary)
    }

    /// Serialize as a multipart body using `boundary`.
    pub fn to_multipart(&self, boundary: &str) -> Vec<u8> {
        let mut body = Vec::new();

        write_part_head(&mut body, boundary, METADATA_FIELD, None, JSON);
        body.extend_from_slice(self.metadata.as_bytes());
        body.extend_from_slice(CRLF);

        for attachment in &self.attachments {
            write_part_head(
                &mut body,
                boundary,
                &attachment.name,
                Some(&attachment.name),
                &attachment.content_type,
            );
            body.extend_from_slice(&attachment.body);
            body.extend_from_slice(CRLF);
        }

        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        body
    }

    /// Parse a multipart body framed with `boundary`.
    ///
    /// The `metadata` part is required; every other part becomes an attachment.
    pub fn from_multipart(body: &[u8], boundary: &str) -> Result<Self, TransferError> {
        let delimiter = format!("--{}", boundary).into_bytes();
        let next_delimiter = format!("\r\n--{}", boundary).into_bytes();

        let mut cursor = find(body, &delimiter, 0)
            .ok_or_else(|| malformed("opening boundary not found"))?
            + delimiter.len();

        let mut metadata = None;
        let mut attachments = Vec::new();

        loop {
            if body[cursor..].starts_with(b"--") {
                break;
            }
            if !body[cursor..].starts_with(CRLF) {
                return Err(malformed("boundary not followed by a line break"));
            }
            cursor += CRLF.len();

            let head_end = find(body, b"\r\n\r\n", cursor)
                .ok_or_else(|| malformed("part headers are not terminated"))?;
            let head = std::str::from_utf8(&body[cursor..head_end])
                .map_err(|_| malformed("part headers are not UTF-8"))?;
            let headers = PartHeaders::parse(head)?;

            let content_start = head_end + 4;
            let content_end = find(body, &next_delimiter, content_start)
                .ok_or_else(|| malformed("part is not terminated by a boundary"))?;
            let content = &body[content_start..content_end];

            if headers.name == METADATA_FIELD {
                let text = std::str::from_utf8(content)
                    .map_err(|_| malformed("metadata part is not UTF-8"))?;
                metadata = Some(text.to_string());
            } else {
                attachments.push(Attachment {
                    name: headers.name,
                    content_type: headers
                        .content_type
                        .unwrap_or_else(|| OCTET_STREAM.to_string()),
                    body: content.to_vec(),
                });
            }

            cursor = content_end + next_delimiter.len();
            if cursor > body.len() {
                return Err(malformed("body ends inside a boundary"));
            }
        }

        Ok(TransferPayload {
            metadata: metadata.ok_or_else(|| malformed("no metadata part"))?,
            attachments,
        })
    }
}

fn write_part_head(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: Option<&str>,
    content_type: &str,
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    let disposition = match filename {
        Some(filename) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
    };
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
}

struct PartHeaders {
    name: String,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(head: &str) -> Result<Self, TransferError> {
        let mut name = None;
        let mut content_type = None;

        for line in head.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                return Err(malformed(&format!("bad header line {:?}", line)));
            };
            let value = value.trim();
            if key.eq_ignore_ascii_case("content-disposition") {
                name = value
                    .split(';')
                    .map(str::trim)
                    .find_map(|param| param.strip_prefix("name="))
                    .map(|n| n.trim_matches('"').to_string());
            } else if key.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }

        Ok(PartHeaders {
            name: name.ok_or_else(|| malformed("part has no name"))?,
            content_type,
        })
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn malformed(reason: &str) -> TransferError {
    TransferError::Malformed(format!("multipart: {}", reason))
}
