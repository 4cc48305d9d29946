//! CLI route: single route table and run context. Dispatches to the cache and presentation.

use crate::cli::help::{command_name, is_mutating};
use crate::cli::output::CommandOutput;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_frame_hex, format_frame_preview, format_metadata_json, format_metadata_text,
    format_replace_summary,
};
use crate::config::{ConfigLoader, LedframeConfig};
use crate::error::{StorageError, SyncError, ValidationError};
use crate::frame::id::generate;
use crate::pixel::{reverse_alternate_columns, PixelBuffer};
use crate::store::{AnimationStore, MemoryAnimationStore, SledAnimationStore};
use crate::sync::{AnimationCache, ReplaceOutcome};
use crate::transfer::{decode_upload, encode_frame_response, encode_upload, TransferPayload};
use crate::types::FrameId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Length of generated multipart boundaries.
const BOUNDARY_LENGTH: usize = 24;

/// How the run context opens its store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Explicit store directory; wins over configuration.
    pub path: Option<PathBuf>,
    /// Use an in-memory store instead of sled.
    pub ephemeral: bool,
}

/// Runtime context for CLI execution: configuration plus the animation cache.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    cache: AnimationCache,
    config: LedframeConfig,
    sled: Option<Arc<SledAnimationStore>>,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        store: StoreOptions,
    ) -> Result<Self, SyncError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(config, &workspace_root, store)
    }

    /// Create run context from an already-loaded configuration.
    pub fn from_config(
        config: LedframeConfig,
        workspace_root: &Path,
        store: StoreOptions,
    ) -> Result<Self, SyncError> {
        config
            .validate()
            .map_err(|errors| SyncError::ConfigError(errors.join("; ")))?;

        let (backing, sled): (Arc<dyn AnimationStore + Send + Sync>, _) = if store.ephemeral {
            debug!("Using in-memory animation store");
            (Arc::new(MemoryAnimationStore::new()), None)
        } else {
            let store_path = store
                .path
                .unwrap_or_else(|| config.storage.resolve_store_path(workspace_root));
            std::fs::create_dir_all(&store_path)
                .map_err(|e| SyncError::PersistenceFailure(StorageError::IoError(e)))?;
            debug!(store_path = %store_path.display(), "Opening animation store");
            let sled_store = Arc::new(SledAnimationStore::new(&store_path)?);
            (
                sled_store.clone() as Arc<dyn AnimationStore + Send + Sync>,
                Some(sled_store),
            )
        };

        let cache = AnimationCache::initialize(backing, config.cache_settings())?;
        if let Some(ref sled_store) = sled {
            sled_store.flush()?;
        }

        Ok(Self {
            cache,
            config,
            sled,
            color: true,
        })
    }

    /// Turn ANSI colour in frame previews on or off.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn cache(&self) -> &AnimationCache {
        &self.cache
    }

    pub fn config(&self) -> &LedframeConfig {
        &self.config
    }

    /// Execute a command through the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, SyncError> {
        let started = Instant::now();
        let result = self.route(command);
        if is_mutating(command) {
            if let Some(ref sled_store) = self.sled {
                sled_store.flush()?;
            }
        }
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn route(&self, command: &Commands) -> Result<CommandOutput, SyncError> {
        match command {
            Commands::List { format } => self.handle_list(format),
            Commands::Show {
                frame_id,
                hardware,
                hex,
            } => self.handle_show(frame_id, *hardware, *hex),
            Commands::Replace { file } => self.handle_replace(file),
            Commands::Export { boundary } => self.handle_export(boundary.as_deref()),
            Commands::Frame { frame_id } => self.handle_frame(frame_id),
        }
    }

    fn handle_list(&self, format: &str) -> Result<CommandOutput, SyncError> {
        let metadata = self.cache.get_metadata()?;
        let text = match format {
            "json" => format_metadata_json(&metadata)?,
            "text" => format_metadata_text(&metadata, self.config.frames.infinite_repeat_sentinel),
            other => {
                return Err(SyncError::ConfigError(format!(
                    "Invalid format: {} (must be 'text' or 'json')",
                    other
                )))
            }
        };
        Ok(CommandOutput::Text(text))
    }

    fn handle_show(&self, raw_id: &str, hardware: bool, hex: bool) -> Result<CommandOutput, SyncError> {
        let frame = self.cache.get_frame(&self.parse_frame_id(raw_id)?)?;

        if hex {
            let bytes = if hardware {
                frame.data.hardware_order()
            } else {
                frame.data.as_bytes().to_vec()
            };
            return Ok(CommandOutput::Text(format_frame_hex(&bytes)?));
        }

        let grid = if hardware {
            reverse_alternate_columns(frame.data.grid())
        } else {
            frame.data.grid()
        };
        Ok(CommandOutput::Text(format!(
            "Frame {} of animation {}\n{}",
            frame.frame_id,
            frame.animation_id,
            format_frame_preview(&grid, self.color)
        )))
    }

    fn handle_replace(&self, file: &Path) -> Result<CommandOutput, SyncError> {
        let document = std::fs::read_to_string(file).map_err(|e| {
            ValidationError::payload("file", format!("cannot read {}: {}", file.display(), e))
        })?;
        let incoming = decode_upload(&document)?;
        debug!(animations = incoming.len(), file = %file.display(), "Decoded upload");

        match self.cache.replace_all(&incoming)? {
            ReplaceOutcome::Persisted(summary) => {
                Ok(CommandOutput::Text(format_replace_summary(&summary)))
            }
            outcome @ ReplaceOutcome::AppliedNotPersisted { .. } => {
                warn!("Replace applied to the cache only");
                outcome.into_result().map(|s| CommandOutput::Text(format_replace_summary(&s)))
            }
        }
    }

    fn handle_export(&self, boundary: Option<&str>) -> Result<CommandOutput, SyncError> {
        let snapshot = self.cache.snapshot();
        let frames: HashMap<FrameId, PixelBuffer> = snapshot
            .frames_in_order()
            .map(|frame| (frame.frame_id.clone(), frame.data.clone()))
            .collect();
        let payload = encode_upload(snapshot.metadata(), &frames)?;

        let boundary = match boundary {
            Some(b) => b.to_string(),
            None => format!("ledframe-{}", generate(BOUNDARY_LENGTH)?),
        };
        debug!(
            content_type = %TransferPayload::content_type(&boundary),
            attachments = payload.attachments.len(),
            "Exporting upload payload"
        );
        Ok(CommandOutput::Bytes(payload.to_multipart(&boundary)))
    }

    fn handle_frame(&self, raw_id: &str) -> Result<CommandOutput, SyncError> {
        let frame = self.cache.get_frame(&self.parse_frame_id(raw_id)?)?;
        Ok(CommandOutput::Bytes(encode_frame_response(&frame).body))
    }

    /// A malformed ID is the caller's mistake, reported like a rejected upload.
    fn parse_frame_id(&self, raw: &str) -> Result<FrameId, SyncError> {
        FrameId::parse(raw, self.cache.settings().id_length)
            .map_err(|e| ValidationError::payload("frame_id", e.to_string()).into())
    }
}
