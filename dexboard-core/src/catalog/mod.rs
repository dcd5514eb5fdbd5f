//! Catalog model and sources
//!
//! The catalog is owned by whichever [`CatalogSource`] produced it. The
//! engine only reads entries; it never edits names, categories or media.
//!
//! # Overview
//!
//! ```text
//! CatalogSource (file / GraphQL)
//!     │
//!     ├── fetch(limit)      ← up to `limit` entries, id ascending
//!     │
//!     ▼
//! CatalogStatus             ← Loading → Ready(entries) | Failed(message)
//!     │
//!     ▼
//! Engine                    ← resolver, tracker, stats, completion
//! ```

mod source;
mod wire;

#[cfg(feature = "remote")]
pub use source::GraphqlSource;
pub use source::FileSource;
pub use wire::{catalog_query, parse_response};

use async_trait::async_trait;

use crate::Result;

/// Stable identity of a catalog entry for the whole session
pub type EntryId = u32;

/// One catalog item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub name: String,
    /// Category tags in source order
    pub categories: Vec<String>,
    /// Raw media descriptor, possibly malformed
    pub media_payload: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: EntryId, name: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            id,
            name: name.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            media_payload: None,
        }
    }

    pub fn with_media(mut self, payload: impl Into<String>) -> Self {
        self.media_payload = Some(payload.into());
        self
    }
}

/// Lifecycle of one catalog query as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    /// No catalog yet; derivations run against an empty catalog
    #[default]
    Loading,
    Ready(Vec<CatalogEntry>),
    /// Terminal for this query, nothing is retried
    Failed(String),
}

impl CatalogStatus {
    /// Entries of a ready catalog, empty otherwise
    pub fn entries(&self) -> &[CatalogEntry] {
        match self {
            CatalogStatus::Ready(entries) => entries,
            CatalogStatus::Loading | CatalogStatus::Failed(_) => &[],
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CatalogStatus::Ready(_))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries().iter().any(|entry| entry.id == id)
    }
}

/// A place the catalog can be fetched from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch up to `limit` entries ordered by id ascending
    async fn fetch(&self, limit: usize) -> Result<Vec<CatalogEntry>>;

    /// Human-readable label for logs
    fn describe(&self) -> String;
}

/// Sort by id and cap at `limit`, the ordering every source guarantees
pub(crate) fn normalize(mut entries: Vec<CatalogEntry>, limit: usize) -> Vec<CatalogEntry> {
    entries.sort_by_key(|entry| entry.id);
    entries.dedup_by_key(|entry| entry.id);
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests;
