//! Integration tests for the sled Animation Store

use super::test_utils::{animation_json, upload};
use ledframe::metadata::Metadata;
use ledframe::store::{AnimationStore, SledAnimationStore};
use ledframe::sync::{AnimationCache, CacheSettings};
use ledframe::types::{FrameId, FRAME_BYTE_LENGTH};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_cache_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let settings = CacheSettings {
        seed_when_empty: false,
        ..CacheSettings::default()
    };

    let (metadata, first_frame) = {
        let store = Arc::new(SledAnimationStore::new(temp_dir.path()).unwrap());
        let cache = AnimationCache::initialize(store.clone(), settings.clone()).unwrap();
        let document = json!([
            animation_json("pulse", 60, 5, &[[1, 2, 3], [4, 5, 6]]),
            animation_json("still", 1000, 0, &[[9, 9, 9]]),
        ]);
        cache
            .replace_all(&upload(document))
            .unwrap()
            .into_result()
            .unwrap();
        store.flush().unwrap();

        let metadata = cache.get_metadata().unwrap();
        let first = cache.get_frame(&metadata[0].frame_order[0]).unwrap();
        (metadata, first)
    };

    let store = Arc::new(SledAnimationStore::new(temp_dir.path()).unwrap());
    assert_eq!(store.frame_count(), 3);
    let cache = AnimationCache::initialize(store, settings).unwrap();

    assert_eq!(cache.get_metadata().unwrap(), metadata);
    let reloaded = cache.get_frame(&first_frame.frame_id).unwrap();
    assert_eq!(reloaded, first_frame);
    assert_eq!(reloaded.data.pixel(0), Some([1, 2, 3]));
}

#[test]
fn test_seed_written_to_fresh_sled_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledAnimationStore::new(temp_dir.path()).unwrap());
    let cache = AnimationCache::initialize(store.clone(), CacheSettings::default()).unwrap();

    let metadata = store.fetch_metadata_array().unwrap();
    assert_eq!(metadata, cache.get_metadata().unwrap());
    let listed: usize = metadata.iter().map(|m| m.total_frames).sum();
    assert_eq!(store.frame_count(), listed);
}

#[test]
fn test_stored_frame_bytes_are_raw() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledAnimationStore::new(temp_dir.path()).unwrap();
    let id = FrameId::parse("c0ffee", 6).unwrap();
    let bytes: Vec<u8> = (0..FRAME_BYTE_LENGTH).map(|i| (i % 256) as u8).collect();

    store.insert_frame("gradient", &id, &bytes).unwrap();
    store
        .replace_metadata_array(&[Metadata::new("gradient", 40, 1, vec![id.clone()])])
        .unwrap();

    assert_eq!(store.fetch_frame(&id).unwrap(), Some(bytes));
    assert_eq!(
        store.fetch_frame(&FrameId::parse("000000", 6).unwrap()).unwrap(),
        None
    );
    assert_eq!(store.fetch_metadata_array().unwrap()[0].frame_order, vec![id]);
}
