//! Engine facade
//!
//! Composes the catalog status, the [`AcquisitionTracker`], the resolvers and
//! the derivations, and publishes a fresh [`Snapshot`] through a
//! `tokio::sync::watch` channel after every state change. Views subscribe and
//! re-render; the only write they perform is
//! [`Engine::initiate_acquire`].

use serde::Serialize;
use std::collections::BTreeSet;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::asset::AssetResolver;
use crate::catalog::{CatalogSource, CatalogStatus, EntryId};
use crate::completion::Progress;
use crate::config::EngineConfig;
use crate::stats::{aggregate, CategoryStats};
use crate::tracker::{AcquireOutcome, AcquisitionState, AcquisitionTracker};

/// Catalog lifecycle as shown to views
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CatalogPhase {
    #[default]
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

/// One cell of the catalog grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridItem {
    pub id: EntryId,
    pub name: String,
    pub categories: Vec<String>,
    /// `None` renders as the placeholder asset
    pub asset: Option<String>,
    pub state: AcquisitionState,
}

/// One acquired entry in the collection view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionItem {
    pub id: EntryId,
    pub name: String,
    pub categories: Vec<String>,
    pub asset: Option<String>,
}

/// Everything a view needs to render, recomputed on every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: CatalogPhase,
    /// Catalog order
    pub items: Vec<GridItem>,
    /// Acquired entries in catalog order
    pub collection: Vec<CollectionItem>,
    pub acquired: BTreeSet<EntryId>,
    /// Acquired ids in completion order
    pub acquired_order: Vec<EntryId>,
    pub in_progress: BTreeSet<EntryId>,
    pub stats: CategoryStats,
    pub progress: Progress,
    pub complete: bool,
}

impl Snapshot {
    pub fn item(&self, id: EntryId) -> Option<&GridItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

pub struct Engine {
    catalog: CatalogStatus,
    catalog_limit: usize,
    tracker: AcquisitionTracker,
    grid_resolver: AssetResolver,
    collection_resolver: AssetResolver,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            catalog: CatalogStatus::Loading,
            catalog_limit: config.catalog_limit,
            tracker: AcquisitionTracker::new(config.acquire_delay()),
            grid_resolver: config.grid_resolver(),
            collection_resolver: config.collection_resolver(),
            snapshot_tx,
        }
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn catalog(&self) -> &CatalogStatus {
        &self.catalog
    }

    pub fn tracker(&self) -> &AcquisitionTracker {
        &self.tracker
    }

    pub fn has_pending(&self) -> bool {
        !self.tracker.in_progress().is_empty()
    }

    /// Replace the catalog status reported by the source
    pub fn set_catalog(&mut self, status: CatalogStatus) {
        self.catalog = status;
        self.publish();
    }

    /// Run one catalog query against `source`
    ///
    /// The status is `Loading` while the query runs, then `Ready` or
    /// `Failed`. A failure is terminal for this query and is not retried.
    pub async fn load_from(&mut self, source: &dyn CatalogSource) -> &CatalogStatus {
        self.set_catalog(CatalogStatus::Loading);
        info!(source = %source.describe(), limit = self.catalog_limit, "Loading catalog");

        let status = match source.fetch(self.catalog_limit).await {
            Ok(entries) => {
                info!(entries = entries.len(), "Catalog ready");
                CatalogStatus::Ready(entries)
            }
            Err(e) => {
                warn!(error = %e.report(), "Catalog load failed");
                CatalogStatus::Failed(e.report())
            }
        };

        self.set_catalog(status);
        &self.catalog
    }

    /// Start acquiring an entry of the ready catalog
    pub fn initiate_acquire(&mut self, id: EntryId) -> AcquireOutcome {
        if !self.catalog.contains(id) {
            debug!(entry_id = id, "Acquire ignored, entry not in catalog");
            return AcquireOutcome::UnknownEntry;
        }

        let outcome = self.tracker.initiate_acquire(id);
        if outcome.is_started() {
            self.publish();
        }
        outcome
    }

    /// Wait for the next completion, apply it and publish
    pub async fn next_completion(&mut self) -> Option<EntryId> {
        let completed = self.tracker.next_completion().await;
        if completed.is_some() {
            self.publish();
        }
        completed
    }

    /// Apply completions that already fired, without waiting
    pub fn drain_completions(&mut self) -> Vec<EntryId> {
        let completed = self.tracker.drain_completions();
        if !completed.is_empty() {
            self.publish();
        }
        completed
    }

    /// Cancel outstanding acquisitions before teardown
    pub fn shutdown(&mut self) -> usize {
        let canceled = self.tracker.cancel_all();
        if canceled > 0 {
            self.publish();
        }
        canceled
    }

    /// Derive the current snapshot
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.catalog.entries();

        let phase = match &self.catalog {
            CatalogStatus::Loading => CatalogPhase::Loading,
            CatalogStatus::Ready(_) => CatalogPhase::Ready,
            CatalogStatus::Failed(message) => CatalogPhase::Failed {
                message: message.clone(),
            },
        };

        let items = entries
            .iter()
            .map(|entry| GridItem {
                id: entry.id,
                name: entry.name.clone(),
                categories: entry.categories.clone(),
                asset: self.grid_resolver.resolve(entry.media_payload.as_deref()),
                state: self.tracker.state(entry.id),
            })
            .collect();

        let collection: Vec<CollectionItem> = entries
            .iter()
            .filter(|entry| self.tracker.is_acquired(entry.id))
            .map(|entry| CollectionItem {
                id: entry.id,
                name: entry.name.clone(),
                categories: entry.categories.clone(),
                asset: self
                    .collection_resolver
                    .resolve(entry.media_payload.as_deref()),
            })
            .collect();

        let progress = Progress::new(collection.len(), entries.len());

        Snapshot {
            phase,
            items,
            acquired: self.tracker.acquired(),
            acquired_order: self.tracker.acquired_in_order().to_vec(),
            in_progress: self.tracker.in_progress(),
            stats: aggregate(entries),
            complete: progress.is_complete(),
            progress,
            collection,
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
