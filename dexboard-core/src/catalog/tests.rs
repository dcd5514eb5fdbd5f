//! Unit tests for the catalog module

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_status_entries_empty_unless_ready() {
    assert!(CatalogStatus::Loading.entries().is_empty());
    assert!(CatalogStatus::Failed("offline".to_string()).entries().is_empty());

    let ready = CatalogStatus::Ready(vec![CatalogEntry::new(1, "bulbasaur", &["grass"])]);
    assert_eq!(ready.entries().len(), 1);
    assert!(ready.is_ready());
    assert!(ready.contains(1));
    assert!(!ready.contains(2));
}

#[test]
fn test_normalize_sorts_dedups_and_truncates() {
    let entries = vec![
        CatalogEntry::new(3, "venusaur", &["grass"]),
        CatalogEntry::new(1, "bulbasaur", &["grass"]),
        CatalogEntry::new(2, "ivysaur", &["grass"]),
        CatalogEntry::new(1, "bulbasaur", &["grass"]),
    ];

    let ids: Vec<EntryId> = normalize(entries, 2).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_file_source_missing_file() {
    let source = FileSource::new("/definitely/not/here.json");
    let err = source.fetch(24).await.unwrap_err();
    assert!(matches!(err, crate::DexboardError::CatalogRead { .. }));
    assert!(source.describe().contains("here.json"));
}
