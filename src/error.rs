//! Error types for the ledframe animation cache.

use crate::types::FrameId;
use thiserror::Error;

/// Pixel buffer and identifier codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: String, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CodecError {
    pub fn invalid_length(expected: impl Into<String>, actual: usize) -> Self {
        CodecError::InvalidLength {
            expected: expected.into(),
            actual,
        }
    }
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// A rejected client payload.
///
/// Carries the position of the first offending entry so the caller can point
/// at it; validation stops at the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub animation: Option<usize>,
    pub frame: Option<usize>,
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.animation, self.frame) {
            (Some(a), Some(fr)) => write!(f, "animation {} frame {} `{}`", a, fr, self.field)?,
            (Some(a), None) => write!(f, "animation {} `{}`", a, self.field)?,
            _ => write!(f, "`{}`", self.field)?,
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn payload(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            animation: None,
            frame: None,
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn animation(index: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            animation: Some(index),
            frame: None,
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn frame(
        animation: usize,
        frame: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            animation: Some(animation),
            frame: Some(frame),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Wire codec errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Unexpected content type: expected {expected}, got {actual}")]
    UnexpectedContentType { expected: String, actual: String },

    #[error("Malformed transfer payload: {0}")]
    Malformed(String),

    #[error("Frame not found: {0}")]
    NotFound(FrameId),

    #[error("Invalid upload: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<serde_json::Error> for TransferError {
    fn from(err: serde_json::Error) -> Self {
        TransferError::Malformed(err.to_string())
    }
}

/// Synchronization engine errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Frame not found: {0}")]
    NotFound(FrameId),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StorageError),

    #[error("Cache inconsistency in animation {animation_id:?}: {reason}")]
    CacheInconsistency {
        animation_id: String,
        frame_id: Option<FrameId>,
        reason: String,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}

/// Upload decode failures surface to the engine's callers with the same
/// response classes as engine errors: a bad document is the client's fault.
impl From<TransferError> for SyncError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Validation(e) => SyncError::ValidationFailed(e),
            TransferError::Malformed(reason) => {
                SyncError::ValidationFailed(ValidationError::payload("metadata", reason))
            }
            TransferError::UnexpectedContentType { expected, actual } => {
                SyncError::ValidationFailed(ValidationError::payload(
                    "content-type",
                    format!("expected {}, got {}", expected, actual),
                ))
            }
            TransferError::NotFound(frame_id) => SyncError::NotFound(frame_id),
            TransferError::Codec(e) => SyncError::Codec(e),
        }
    }
}

/// Response class of an error at a request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    Internal,
}

impl ErrorStatus {
    pub fn code(self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::NotFound => 404,
            ErrorStatus::Internal => 500,
        }
    }
}

impl SyncError {
    pub fn status(&self) -> ErrorStatus {
        match self {
            SyncError::ValidationFailed(_) => ErrorStatus::BadRequest,
            SyncError::NotFound(_) => ErrorStatus::NotFound,
            _ => ErrorStatus::Internal,
        }
    }

    /// Message safe to hand to a client. Server-side failures are reduced to a
    /// generic line; the detail belongs in the log.
    pub fn public_message(&self) -> String {
        match self.status() {
            ErrorStatus::Internal => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}
