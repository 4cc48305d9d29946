//! Integration tests for the synchronization engine

use super::test_utils::{animation_json, solid_frame, upload, FlakyStore};
use ledframe::error::SyncError;
use ledframe::metadata::Metadata;
use ledframe::store::{AnimationStore, MemoryAnimationStore};
use ledframe::sync::{AnimationCache, CacheSettings, ReplaceOutcome};
use ledframe::types::{FrameId, FRAME_BYTE_LENGTH, FRAME_PIXEL_COUNT};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const BLUE: [u8; 3] = [0, 0, 255];

fn unseeded() -> CacheSettings {
    CacheSettings {
        seed_when_empty: false,
        ..CacheSettings::default()
    }
}

fn empty_cache() -> (Arc<MemoryAnimationStore>, AnimationCache) {
    let store = Arc::new(MemoryAnimationStore::new());
    let cache = AnimationCache::initialize(store.clone(), unseeded()).unwrap();
    (store, cache)
}

fn two_animations() -> serde_json::Value {
    json!([
        animation_json("rgb", 100, 2, &[RED, GREEN, BLUE]),
        animation_json("solo", 250, 0, &[GREEN]),
    ])
}

#[test]
fn test_replace_builds_metadata_and_frames() {
    let (store, cache) = empty_cache();

    let outcome = cache.replace_all(&upload(two_animations())).unwrap();
    assert!(outcome.is_persisted());
    assert_eq!(outcome.summary().animations, 2);
    assert_eq!(outcome.summary().frames, 4);

    let metadata = cache.get_metadata().unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].animation_id, "rgb");
    assert_eq!(metadata[0].total_frames, 3);
    assert_eq!(metadata[0].frame_duration, 100);
    assert_eq!(metadata[1].animation_id, "solo");
    assert_eq!(metadata[1].total_frames, 1);

    let all_ids: HashSet<&FrameId> = metadata.iter().flat_map(|m| &m.frame_order).collect();
    assert_eq!(all_ids.len(), 4, "frame ids are unique across animations");
    assert!(all_ids.iter().all(|id| id.as_str().len() == 6));

    // Playback order follows upload order
    let colours: Vec<[u8; 3]> = metadata[0]
        .frame_order
        .iter()
        .map(|id| cache.get_frame(id).unwrap().data.pixel(0).unwrap())
        .collect();
    assert_eq!(colours, vec![RED, GREEN, BLUE]);

    // Everything reached the store
    assert_eq!(store.fetch_metadata_array().unwrap(), metadata);
    for id in all_ids {
        let stored = store.stored_frame(id).unwrap();
        assert_eq!(stored.data.len(), FRAME_BYTE_LENGTH);
    }
}

#[test]
fn test_short_frame_rejects_whole_upload() {
    let (store, cache) = empty_cache();
    cache.replace_all(&upload(two_animations())).unwrap();
    let before = cache.get_metadata().unwrap();

    let mut bad = animation_json("broken", 100, 1, &[RED]);
    bad["frames"][0] = solid_frame(RED, FRAME_PIXEL_COUNT - 1);
    let document = json!([animation_json("fine", 100, 1, &[BLUE]), bad]);

    let err = cache.replace_all(&upload(document)).unwrap_err();
    match err {
        SyncError::ValidationFailed(e) => {
            assert_eq!(e.animation, Some(1));
            assert_eq!(e.frame, Some(0));
            assert!(e.reason.contains("255"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    assert_eq!(cache.get_metadata().unwrap(), before);
    assert_eq!(store.fetch_metadata_array().unwrap(), before);
}

#[test]
fn test_invalid_fields_are_rejected() {
    let (_store, cache) = empty_cache();

    let mut zero_duration = animation_json("a", 100, 1, &[RED]);
    zero_duration["frameDuration"] = json!(0);
    let mut no_frames = animation_json("b", 100, 1, &[RED]);
    no_frames["frames"] = json!([]);
    let mut missing_id = animation_json("c", 100, 1, &[RED]);
    missing_id.as_object_mut().unwrap().remove("animationID");

    for document in [json!([zero_duration]), json!([no_frames]), json!([missing_id])] {
        let err = cache.replace_all(&upload(document)).unwrap_err();
        assert!(matches!(err, SyncError::ValidationFailed(_)));
        assert_eq!(err.status().code(), 400);
    }
    assert!(cache.get_metadata().unwrap().is_empty());
}

#[test]
fn test_duplicate_animation_ids_are_rejected() {
    let (_store, cache) = empty_cache();
    let document = json!([
        animation_json("same", 100, 1, &[RED]),
        animation_json("same", 200, 1, &[BLUE]),
    ]);
    assert!(matches!(
        cache.replace_all(&upload(document)),
        Err(SyncError::ValidationFailed(_))
    ));
}

#[test]
fn test_client_frame_ids_are_discarded() {
    let (_store, cache) = empty_cache();
    let mut animation = animation_json("ids", 100, 1, &[RED, GREEN]);
    animation["frameOrder"] = json!(["aaaaaa", "bbbbbb"]);
    animation["frameIDs"] = json!(["aaaaaa", "bbbbbb"]);

    cache.replace_all(&upload(json!([animation]))).unwrap();
    let metadata = cache.get_metadata().unwrap();
    let order: Vec<&str> = metadata[0].frame_order.iter().map(|id| id.as_str()).collect();
    assert_eq!(order.len(), 2);
    assert!(!(order[0] == "aaaaaa" && order[1] == "bbbbbb"));
}

#[test]
fn test_replace_replaces_everything() {
    let (_store, cache) = empty_cache();
    cache.replace_all(&upload(two_animations())).unwrap();
    let old_ids: Vec<FrameId> = cache
        .get_metadata()
        .unwrap()
        .into_iter()
        .flat_map(|m| m.frame_order)
        .collect();

    cache
        .replace_all(&upload(json!([animation_json("only", 50, 1, &[BLUE])])))
        .unwrap();

    let metadata = cache.get_metadata().unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].animation_id, "only");
    assert_eq!(cache.snapshot().frame_count(), 1);
    for id in &old_ids {
        if !metadata[0].frame_order.contains(id) {
            assert!(matches!(cache.get_frame(id), Err(SyncError::NotFound(_))));
        }
    }
}

#[test]
fn test_empty_upload_clears_cache() {
    let (store, cache) = empty_cache();
    cache.replace_all(&upload(two_animations())).unwrap();

    let outcome = cache.replace_all(&upload(json!([]))).unwrap();
    assert!(outcome.is_persisted());
    assert!(cache.get_metadata().unwrap().is_empty());
    assert!(store.fetch_metadata_array().unwrap().is_empty());
}

#[test]
fn test_failing_store_keeps_new_cache() {
    let store = Arc::new(FlakyStore::new());
    let cache = AnimationCache::initialize(store.clone(), unseeded()).unwrap();
    cache.replace_all(&upload(two_animations())).unwrap();
    let persisted = store.fetch_metadata_array().unwrap();

    store.set_failing(true);
    let outcome = cache
        .replace_all(&upload(json!([animation_json("new", 80, 1, &[BLUE])])))
        .unwrap();
    match &outcome {
        ReplaceOutcome::AppliedNotPersisted { summary, error } => {
            assert_eq!(summary.animations, 1);
            assert!(error.to_string().contains("disk unavailable"));
        }
        ReplaceOutcome::Persisted(_) => panic!("store write should have failed"),
    }

    // Cache serves the new data, store still has the old
    assert_eq!(cache.get_metadata().unwrap()[0].animation_id, "new");
    assert_eq!(store.fetch_metadata_array().unwrap(), persisted);

    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, SyncError::PersistenceFailure(_)));
    assert_eq!(err.public_message(), "internal server error");
}

#[test]
fn test_every_persist_ends_with_a_flush() {
    let store = Arc::new(FlakyStore::new());
    let cache = AnimationCache::initialize(store.clone(), CacheSettings::default()).unwrap();
    assert_eq!(store.flushes(), 1, "seeding persists and flushes");

    cache.replace_all(&upload(two_animations())).unwrap();
    assert_eq!(store.flushes(), 2);

    // Rejected uploads never reach the store
    let short = json!([{ "animationID": "x", "frameDuration": 10, "repeatCount": 0,
                         "frames": [solid_frame(RED, FRAME_PIXEL_COUNT - 1)] }]);
    assert!(cache.replace_all(&upload(short)).is_err());
    assert_eq!(store.flushes(), 2);

    store.set_failing(true);
    let outcome = cache.replace_all(&upload(two_animations())).unwrap();
    assert!(!outcome.is_persisted());
    assert_eq!(store.flushes(), 2);
}

#[test]
fn test_initialize_reports_missing_frame() {
    let store = Arc::new(MemoryAnimationStore::new());
    let present = FrameId::parse("00aa11", 6).unwrap();
    let missing = FrameId::parse("ffee00", 6).unwrap();
    store
        .insert_frame("broken", &present, &[0u8; FRAME_BYTE_LENGTH])
        .unwrap();
    store
        .replace_metadata_array(&[Metadata::new(
            "broken",
            100,
            1,
            vec![present, missing.clone()],
        )])
        .unwrap();

    let err = AnimationCache::initialize(store, unseeded()).err().unwrap();
    match err {
        SyncError::CacheInconsistency {
            animation_id,
            frame_id,
            ..
        } => {
            assert_eq!(animation_id, "broken");
            assert_eq!(frame_id, Some(missing));
        }
        other => panic!("expected cache inconsistency, got {other:?}"),
    }
}

#[test]
fn test_initialize_rejects_mismatched_total_frames() {
    let store = Arc::new(MemoryAnimationStore::new());
    let id = FrameId::parse("123abc", 6).unwrap();
    store.insert_frame("a", &id, &[0u8; FRAME_BYTE_LENGTH]).unwrap();
    let mut entry = Metadata::new("a", 100, 1, vec![id]);
    entry.total_frames = 2;
    store.replace_metadata_array(&[entry]).unwrap();

    assert!(matches!(
        AnimationCache::initialize(store, unseeded()),
        Err(SyncError::CacheInconsistency { .. })
    ));
}

#[test]
fn test_seeding_happens_once() {
    let store = Arc::new(MemoryAnimationStore::new());
    let first = AnimationCache::initialize(store.clone(), CacheSettings::default()).unwrap();
    let seeded = first.get_metadata().unwrap();
    assert!(!seeded.is_empty());
    let frames_after_seed = store.frame_count();

    let second = AnimationCache::initialize(store.clone(), CacheSettings::default()).unwrap();
    assert_eq!(second.get_metadata().unwrap(), seeded);
    assert_eq!(store.frame_count(), frames_after_seed);
}

#[test]
fn test_get_frame_not_found() {
    let (_store, cache) = empty_cache();
    let err = cache
        .get_frame(&FrameId::parse("abcdef", 6).unwrap())
        .unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
    assert_eq!(err.status().code(), 404);
}

#[test]
fn test_readers_see_consistent_snapshots() {
    let (_store, cache) = empty_cache();
    let cache = Arc::new(cache);
    cache.replace_all(&upload(two_animations())).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = cache.snapshot();
                    for entry in snapshot.metadata() {
                        assert_eq!(entry.total_frames, entry.frame_order.len());
                        for id in &entry.frame_order {
                            let frame = snapshot.frame(id).expect("frame of a listed animation");
                            assert_eq!(frame.animation_id, entry.animation_id);
                        }
                    }
                }
            })
        })
        .collect();

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for round in 0..20u8 {
                let colour = [round, round, round];
                let document = if round % 2 == 0 {
                    json!([animation_json("even", 10, 1, &[colour, colour])])
                } else {
                    two_animations()
                };
                cache.replace_all(&upload(document)).unwrap().into_result().unwrap();
            }
        })
    };

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
