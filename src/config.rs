//! Configuration System
//!
//! Layered configuration for the animation cache: built-in defaults, then the
//! global config file, then workspace files, then `LEDFRAME__*` environment
//! variables. Validated before use.

use crate::logging::LoggingConfig;
use crate::sync::CacheSettings;
use crate::types::DEFAULT_FRAME_ID_LENGTH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Longest frame id the store accepts.
pub const MAX_FRAME_ID_LENGTH: usize = 32;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedframeConfig {
    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,

    /// Frame identifier and playback settings
    #[serde(default)]
    pub frames: FrameSettings,

    /// Seed data settings
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sled database directory, relative to the workspace root unless absolute
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".ledframe/store")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl StorageConfig {
    /// Resolve the store path against a workspace root.
    pub fn resolve_store_path(&self, workspace_root: &Path) -> PathBuf {
        if self.store_path.is_absolute() {
            self.store_path.clone()
        } else {
            workspace_root.join(&self.store_path)
        }
    }
}

/// Frame settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Length of generated frame identifiers
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// `repeatCount` value that means "loop forever"; unset disables the sentinel
    #[serde(default = "default_infinite_repeat_sentinel")]
    pub infinite_repeat_sentinel: Option<u32>,
}

fn default_id_length() -> usize {
    DEFAULT_FRAME_ID_LENGTH
}

fn default_infinite_repeat_sentinel() -> Option<u32> {
    Some(0)
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            id_length: default_id_length(),
            infinite_repeat_sentinel: default_infinite_repeat_sentinel(),
        }
    }
}

/// Seed data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Write demo animations when the store is empty
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl LedframeConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.storage.store_path.as_os_str().is_empty() {
            errors.push("storage.store_path cannot be empty".to_string());
        }
        if self.frames.id_length < 1 || self.frames.id_length > MAX_FRAME_ID_LENGTH {
            errors.push(format!(
                "frames.id_length must be between 1 and {}, got {}",
                MAX_FRAME_ID_LENGTH, self.frames.id_length
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Settings for the synchronization engine.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            id_length: self.frames.id_length,
            seed_when_empty: self.seed.enabled,
        }
    }
}
