//! CLI output: command results and error mapping to a stable CLI surface.

use crate::error::{ErrorStatus, SyncError};
use std::io::Write;

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Human-readable text, printed with a trailing newline.
    Text(String),
    /// Raw bytes written to stdout untouched.
    Bytes(Vec<u8>),
}

impl CommandOutput {
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self {
            CommandOutput::Text(text) => writeln!(out, "{}", text),
            CommandOutput::Bytes(bytes) => out.write_all(bytes),
        }?;
        out.flush()
    }
}

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &SyncError) -> String {
    match e.status() {
        ErrorStatus::BadRequest => format!("rejected: {}", e),
        ErrorStatus::NotFound => format!("not found: {}", e),
        ErrorStatus::Internal => format!("error: {}", e),
    }
}

/// Process exit code for an error.
pub fn exit_code(e: &SyncError) -> i32 {
    match e.status() {
        ErrorStatus::BadRequest => 2,
        ErrorStatus::NotFound => 3,
        ErrorStatus::Internal => 1,
    }
}
