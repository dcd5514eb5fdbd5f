//! End-to-end engine tests against saved catalog responses
//!
//! Fixtures live in `tests/fixtures/`:
//! - catalog.json - four entries, unsorted, covering every fallback link
//! - errors.json  - a rejected query

use dexboard_core::catalog::FileSource;
use dexboard_core::{
    AcquireOutcome, AcquisitionState, CatalogPhase, Engine, EngineConfig, Progress,
    PLACEHOLDER_ASSET,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

async fn ready_engine(config: &EngineConfig) -> Engine {
    let mut engine = Engine::new(config);
    let status = engine
        .load_from(&FileSource::new(fixture("catalog.json")))
        .await;
    assert!(status.is_ready());
    engine
}

#[tokio::test(start_paused = true)]
async fn test_grid_is_sorted_and_resolved() {
    let engine = ready_engine(&EngineConfig::default()).await;
    let snapshot = engine.snapshot();

    let ids: Vec<u32> = snapshot.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 4, 6, 7]);

    let assets: Vec<Option<&str>> = snapshot
        .items
        .iter()
        .map(|item| item.asset.as_deref())
        .collect();
    assert_eq!(
        assets,
        vec![
            Some("https://img.example/front/1.png"),
            Some("https://img.example/artwork/4.png"),
            Some("https://img.example/home/6.png"),
            None,
        ]
    );
    assert!(snapshot
        .items
        .iter()
        .all(|item| item.state == AcquisitionState::NotAcquired));
}

#[tokio::test(start_paused = true)]
async fn test_stats_over_full_catalog() {
    let engine = ready_engine(&EngineConfig::default()).await;
    let stats = engine.snapshot().stats;

    let counts: Vec<(&str, usize)> = stats.iter().collect();
    assert_eq!(
        counts,
        vec![("grass", 1), ("poison", 1), ("fire", 2), ("flying", 1), ("water", 1)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_limit_truncates_catalog() {
    let config = EngineConfig {
        catalog_limit: 2,
        ..EngineConfig::default()
    };
    let engine = ready_engine(&config).await;
    let ids: Vec<u32> = engine.snapshot().items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_acquire_everything_completes_collection() {
    let mut engine = ready_engine(&EngineConfig::default()).await;
    let mut rx = engine.subscribe();

    for id in [7, 1, 6, 4] {
        assert_eq!(engine.initiate_acquire(id), AcquireOutcome::Started);
    }
    assert_eq!(engine.initiate_acquire(6), AcquireOutcome::AlreadyAcquiring);
    assert_eq!(
        rx.borrow_and_update().in_progress,
        BTreeSet::from([1, 4, 6, 7])
    );

    let mut completed = BTreeSet::new();
    while let Some(id) = engine.next_completion().await {
        completed.insert(id);
        assert!(!rx.borrow_and_update().in_progress.contains(&id));
    }
    assert_eq!(completed, BTreeSet::from([1, 4, 6, 7]));

    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.progress, Progress::new(4, 4));
    assert!(snapshot.complete);
    assert_eq!(snapshot.acquired_order.len(), 4);

    // Collection keeps catalog order and resolves the primary field only
    let collection: Vec<(u32, Option<&str>)> = snapshot
        .collection
        .iter()
        .map(|item| (item.id, item.asset.as_deref()))
        .collect();
    assert_eq!(
        collection,
        vec![
            (1, Some("https://img.example/front/1.png")),
            (4, None),
            (6, None),
            (7, None),
        ]
    );
    assert_eq!(engine.initiate_acquire(1), AcquireOutcome::AlreadyAcquired);
}

#[tokio::test(start_paused = true)]
async fn test_collection_depth_is_configurable() {
    let mut config = EngineConfig::default();
    config.resolver.collection_depth = 3;
    let mut engine = ready_engine(&config).await;

    engine.initiate_acquire(4);
    engine.next_completion().await;

    let snapshot = engine.snapshot();
    assert_eq!(
        snapshot.collection[0].asset.as_deref(),
        Some("https://img.example/artwork/4.png")
    );
}

#[tokio::test]
async fn test_rejected_query_is_terminal_failure() {
    let mut engine = Engine::new(&EngineConfig::default());
    engine
        .load_from(&FileSource::new(fixture("errors.json")))
        .await;

    let snapshot = engine.snapshot();
    match &snapshot.phase {
        CatalogPhase::Failed { message } => assert!(message.contains("not found")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(snapshot.stats.is_empty());
    assert!(!snapshot.complete);
    assert_eq!(engine.initiate_acquire(1), AcquireOutcome::UnknownEntry);
}

#[tokio::test]
async fn test_missing_file_is_terminal_failure() {
    let mut engine = Engine::new(&EngineConfig::default());
    let status = engine
        .load_from(&FileSource::new(fixture("does-not-exist.json")))
        .await;
    assert!(!status.is_ready());
    assert!(!engine.snapshot().complete);
}

#[test]
fn test_placeholder_for_unresolved_asset() {
    let resolver = EngineConfig::default().grid_resolver();
    assert_eq!(
        resolver.resolve_or_placeholder(Some("{not valid json")),
        PLACEHOLDER_ASSET
    );
}
