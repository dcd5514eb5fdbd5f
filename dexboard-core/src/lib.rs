//! dexboard core library
//!
//! Client-side tracking and aggregation engine that sits between a remote
//! catalog and the views that render it.

pub mod asset;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod stats;
pub mod tracker;

pub use asset::{placeholder_or, AssetResolver, PLACEHOLDER_ASSET};
pub use catalog::{CatalogEntry, CatalogSource, CatalogStatus, EntryId};
pub use completion::{is_complete, Progress};
pub use config::{EngineConfig, ResolverConfig};
pub use engine::{CatalogPhase, CollectionItem, Engine, GridItem, Snapshot};
pub use error::{DexboardError, Result};
pub use stats::{aggregate, category_color, CategoryBar, CategoryStats, DEFAULT_CATEGORY_COLOR};
pub use tracker::{AcquireOutcome, AcquisitionState, AcquisitionTracker};
