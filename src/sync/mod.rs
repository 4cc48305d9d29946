//! Animation Cache Synchronization
//!
//! Holds the authoritative in-memory copy of every frame and metadata entry and
//! keeps it in step with the persisted store.
//!
//! Both collections live in one immutable [`CacheSnapshot`]. Readers clone the
//! current `Arc` and never see a half-built generation; a full replace builds a
//! new snapshot off to the side and swaps the pointer in a single critical
//! section. Replaces are serialized against each other by `write_lock`, which
//! is held through the persistence sweep.

pub mod seed;

use crate::error::{CodecError, StorageError, SyncError};
use crate::frame::id::generate_frame_id;
use crate::frame::Frame;
use crate::metadata::Metadata;
use crate::store::AnimationStore;
use crate::types::{FrameId, DEFAULT_FRAME_ID_LENGTH};
use crate::validation::{validate_animations, ClientAnimation, ValidatedAnimation};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Attempts at drawing an unused frame ID before giving up on a replace.
const MAX_ID_ATTEMPTS: usize = 64;

/// Engine settings, usually derived from [`crate::config::LedframeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Length of server-assigned frame IDs.
    pub id_length: usize,
    /// Write seed animations when the store holds no metadata.
    pub seed_when_empty: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_FRAME_ID_LENGTH,
            seed_when_empty: true,
        }
    }
}

/// One consistent generation of the cache.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    frames: HashMap<FrameId, Frame>,
    metadata: Vec<Metadata>,
}

impl CacheSnapshot {
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn frame(&self, frame_id: &FrameId) -> Option<&Frame> {
        self.frames.get(frame_id)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames of every animation, in display order then playback order.
    pub fn frames_in_order(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.metadata
            .iter()
            .flat_map(|m| m.frame_order.iter())
            .filter_map(|id| self.frames.get(id))
    }
}

/// Counts from an applied replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub animations: usize,
    pub frames: usize,
}

/// Result of a replace that passed validation.
///
/// The in-memory swap is never rolled back. When the store write fails
/// afterwards, the cache serves the new data while the store still holds
/// (part of) the old; `AppliedNotPersisted` reports that gap.
#[must_use]
#[derive(Debug)]
pub enum ReplaceOutcome {
    Persisted(ReplaceSummary),
    AppliedNotPersisted {
        summary: ReplaceSummary,
        error: StorageError,
    },
}

impl ReplaceOutcome {
    pub fn summary(&self) -> ReplaceSummary {
        match self {
            ReplaceOutcome::Persisted(summary) => *summary,
            ReplaceOutcome::AppliedNotPersisted { summary, .. } => *summary,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, ReplaceOutcome::Persisted(_))
    }

    /// Treat a persistence gap as an error.
    pub fn into_result(self) -> Result<ReplaceSummary, SyncError> {
        match self {
            ReplaceOutcome::Persisted(summary) => Ok(summary),
            ReplaceOutcome::AppliedNotPersisted { error, .. } => {
                Err(SyncError::PersistenceFailure(error))
            }
        }
    }
}

/// The synchronization engine.
pub struct AnimationCache {
    store: Arc<dyn AnimationStore + Send + Sync>,
    settings: CacheSettings,
    snapshot: RwLock<Arc<CacheSnapshot>>,
    write_lock: Mutex<()>,
}

impl AnimationCache {
    /// Load the cache from `store`, seeding it first if it is empty.
    ///
    /// Every frame referenced by metadata must be present in the store. Any
    /// gap is a `CacheInconsistency` and no cache is built.
    pub fn initialize(
        store: Arc<dyn AnimationStore + Send + Sync>,
        settings: CacheSettings,
    ) -> Result<Self, SyncError> {
        if settings.id_length < 1 {
            return Err(SyncError::Codec(CodecError::InvalidArgument(
                "frame id length must be at least 1".to_string(),
            )));
        }

        let mut metadata = store.fetch_metadata_array()?;
        if metadata.is_empty() && settings.seed_when_empty {
            warn!("Store holds no animations; writing seed data");
            let seeded = assemble(
                seed::seed_animations(),
                settings.id_length,
                &mut rand::thread_rng(),
            )?;
            persist(store.as_ref(), &seeded)?;
            metadata = store.fetch_metadata_array()?;
        }

        let snapshot = load_snapshot(store.as_ref(), metadata, settings.id_length)?;
        info!(
            animations = snapshot.metadata.len(),
            frames = snapshot.frames.len(),
            "Animation cache initialized"
        );

        Ok(Self {
            store,
            settings,
            snapshot: RwLock::new(Arc::new(snapshot)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Current generation of the cache.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        Arc::clone(&*self.snapshot.read())
    }

    /// Replace every animation with `incoming`.
    ///
    /// The payload is validated in full before anything changes. Frame IDs are
    /// always assigned here; whatever the client sent is discarded. After the
    /// swap the store gets the new metadata document, then every frame.
    pub fn replace_all(&self, incoming: &[ClientAnimation]) -> Result<ReplaceOutcome, SyncError> {
        let _writer = self.write_lock.lock();

        let validated = validate_animations(incoming).map_err(|e| {
            warn!(error = %e, "Rejected animation upload");
            e
        })?;
        let next = Arc::new(assemble(
            validated,
            self.settings.id_length,
            &mut rand::thread_rng(),
        )?);
        verify(&next, self.settings.id_length)?;
        let summary = ReplaceSummary {
            animations: next.metadata.len(),
            frames: next.frames.len(),
        };

        *self.snapshot.write() = Arc::clone(&next);
        info!(
            animations = summary.animations,
            frames = summary.frames,
            "Animation cache replaced"
        );

        match persist(self.store.as_ref(), &next) {
            Ok(()) => Ok(ReplaceOutcome::Persisted(summary)),
            Err(error) => {
                error!(
                    error = %error,
                    "Animation cache replaced in memory but not persisted; store is stale"
                );
                Ok(ReplaceOutcome::AppliedNotPersisted { summary, error })
            }
        }
    }

    /// All metadata in display order.
    ///
    /// Re-checks every entry on the way out; a violation means the cache
    /// itself is corrupt.
    pub fn get_metadata(&self) -> Result<Vec<Metadata>, SyncError> {
        let snapshot = self.snapshot();
        verify(&snapshot, self.settings.id_length)?;
        Ok(snapshot.metadata.clone())
    }

    /// Look a frame up in the cache. The store is not consulted.
    pub fn get_frame(&self, frame_id: &FrameId) -> Result<Frame, SyncError> {
        self.snapshot()
            .frame(frame_id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(frame_id.clone()))
    }
}

/// Build a fresh snapshot from validated animations, assigning new frame IDs.
fn assemble<R: Rng + ?Sized>(
    animations: Vec<ValidatedAnimation>,
    id_length: usize,
    rng: &mut R,
) -> Result<CacheSnapshot, SyncError> {
    let mut frames = HashMap::new();
    let mut metadata = Vec::with_capacity(animations.len());

    for animation in animations {
        let mut frame_order = Vec::with_capacity(animation.frames.len());
        for data in animation.frames {
            let frame_id = unused_frame_id(&frames, id_length, rng)?;
            frame_order.push(frame_id.clone());
            frames.insert(
                frame_id.clone(),
                Frame::new(frame_id, animation.animation_id.clone(), data),
            );
        }
        metadata.push(Metadata::new(
            animation.animation_id,
            animation.frame_duration,
            animation.repeat_count,
            frame_order,
        ));
    }

    Ok(CacheSnapshot { frames, metadata })
}

fn unused_frame_id<R: Rng + ?Sized>(
    taken: &HashMap<FrameId, Frame>,
    id_length: usize,
    rng: &mut R,
) -> Result<FrameId, SyncError> {
    for attempt in 0..MAX_ID_ATTEMPTS {
        let candidate = generate_frame_id(rng, id_length)?;
        if !taken.contains_key(&candidate) {
            return Ok(candidate);
        }
        warn!(frame_id = %candidate, attempt, "Generated frame id collided; drawing again");
    }
    Err(SyncError::Codec(CodecError::InvalidArgument(format!(
        "no unused {}-character frame id after {} attempts",
        id_length, MAX_ID_ATTEMPTS
    ))))
}

/// Run the metadata checks over a whole snapshot.
fn verify(snapshot: &CacheSnapshot, id_length: usize) -> Result<(), SyncError> {
    for entry in &snapshot.metadata {
        entry
            .check(id_length)
            .map_err(|v| SyncError::CacheInconsistency {
                animation_id: entry.animation_id.clone(),
                frame_id: v.frame_id,
                reason: v.reason,
            })?;
    }
    Ok(())
}

/// Write a snapshot to the store: metadata first, then every frame.
fn persist(store: &dyn AnimationStore, snapshot: &CacheSnapshot) -> Result<(), StorageError> {
    store.replace_metadata_array(&snapshot.metadata)?;
    for frame in snapshot.frames_in_order() {
        store.insert_frame(&frame.animation_id, &frame.frame_id, frame.data.as_bytes())?;
    }
    store.flush()?;
    debug!(frames = snapshot.frames.len(), "Persisted animation frames");
    Ok(())
}

/// Materialize a snapshot from stored metadata, fetching every frame.
fn load_snapshot(
    store: &dyn AnimationStore,
    metadata: Vec<Metadata>,
    id_length: usize,
) -> Result<CacheSnapshot, SyncError> {
    let mut frames = HashMap::new();
    let mut animation_ids = HashSet::new();

    for entry in &metadata {
        let inconsistency = |frame_id: Option<FrameId>, reason: String| SyncError::CacheInconsistency {
            animation_id: entry.animation_id.clone(),
            frame_id,
            reason,
        };

        if !animation_ids.insert(entry.animation_id.clone()) {
            return Err(inconsistency(None, "animation id appears twice".to_string()));
        }
        entry
            .check(id_length)
            .map_err(|v| inconsistency(v.frame_id, v.reason))?;

        for frame_id in &entry.frame_order {
            let bytes = store.fetch_frame(frame_id)?.ok_or_else(|| {
                inconsistency(
                    Some(frame_id.clone()),
                    format!("frame {} is missing from the store", frame_id),
                )
            })?;
            let frame = Frame::from_bytes(frame_id.clone(), entry.animation_id.clone(), bytes)
                .map_err(|e| inconsistency(Some(frame_id.clone()), e.to_string()))?;
            if frames.insert(frame_id.clone(), frame).is_some() {
                return Err(inconsistency(
                    Some(frame_id.clone()),
                    format!("frame {} is referenced by more than one animation", frame_id),
                ));
            }
        }
    }

    Ok(CacheSnapshot { frames, metadata })
}
