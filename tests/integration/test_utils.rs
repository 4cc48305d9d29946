//! Shared test utilities for integration tests
//!
//! Upload builders, a store that fails on demand, and XDG isolation for config
//! tests.

use ledframe::error::StorageError;
use ledframe::metadata::Metadata;
use ledframe::store::{AnimationStore, MemoryAnimationStore};
use ledframe::types::{FrameId, FRAME_PIXEL_COUNT};
use ledframe::validation::{parse_entries, ClientAnimation};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// A dense `{"0": [r,g,b], ...}` frame with `pixels` entries of one colour.
pub fn solid_frame(rgb: [u8; 3], pixels: usize) -> Value {
    let map: Map<String, Value> = (0..pixels).map(|i| (i.to_string(), json!(rgb))).collect();
    Value::Object(map)
}

/// One client animation with full-size solid frames, one per colour.
pub fn animation_json(id: &str, duration: u32, repeat: u32, colours: &[[u8; 3]]) -> Value {
    let frames: Vec<Value> = colours
        .iter()
        .map(|&rgb| solid_frame(rgb, FRAME_PIXEL_COUNT))
        .collect();
    json!({
        "animationID": id,
        "frameDuration": duration,
        "repeatCount": repeat,
        "frames": frames,
    })
}

/// Parse an upload document the way the server does.
pub fn upload(document: Value) -> Vec<ClientAnimation> {
    parse_entries(document).expect("test upload should be an array of objects")
}

/// Memory store whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryAnimationStore,
    fail_writes: AtomicBool,
    flushes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `flush` calls.
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryAnimationStore {
        &self.inner
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StorageError::Backend("disk unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AnimationStore for FlakyStore {
    fn fetch_metadata_array(&self) -> Result<Vec<Metadata>, StorageError> {
        self.inner.fetch_metadata_array()
    }

    fn replace_metadata_array(&self, metadata: &[Metadata]) -> Result<(), StorageError> {
        self.check()?;
        self.inner.replace_metadata_array(metadata)
    }

    fn fetch_frame(&self, frame_id: &FrameId) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.fetch_frame(frame_id)
    }

    fn insert_frame(
        &self,
        animation_id: &str,
        frame_id: &FrameId,
        data: &[u8],
    ) -> Result<(), StorageError> {
        self.check()?;
        self.inner.insert_frame(animation_id, frame_id, data)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.check()?;
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with `XDG_CONFIG_HOME` pointed at `test_dir`, restoring it afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::var_os("XDG_CONFIG_HOME");

    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());
    let result = f();

    match original {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
    result
}

/// Run `f` with extra environment variables set, removing them afterwards.
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = f();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    result
}
