//! Engine configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. An explicit path (`--config`)
//! 2. `.dexboard/config.yml` - Project-level config
//! 3. `~/.config/dexboard/config.yml` - Global config
//! 4. Built-in defaults
//!
//! The first file found wins; files are not merged. Keys missing from a file
//! take their default.
//!
//! ```yaml
//! acquire_delay_ms: 700
//! catalog_limit: 24
//! endpoint: https://beta.pokeapi.co/graphql/v1beta
//! request_timeout_secs: 30
//! resolver:
//!   grid_depth: 3
//!   collection_depth: 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::asset::AssetResolver;
use crate::{DexboardError, Result};

const CONFIG_DIR: &str = ".dexboard";
const CONFIG_FILE: &str = "config.yml";

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulated latency of one acquisition
    #[serde(default = "default_acquire_delay_ms")]
    pub acquire_delay_ms: u64,

    /// Maximum number of catalog entries requested
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: usize,

    /// GraphQL endpoint of the remote catalog
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout for the catalog request in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Fallback chain depth per view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_grid_depth")]
    pub grid_depth: usize,

    #[serde(default = "default_collection_depth")]
    pub collection_depth: usize,
}

fn default_acquire_delay_ms() -> u64 {
    700
}

fn default_catalog_limit() -> usize {
    24
}

fn default_endpoint() -> String {
    "https://beta.pokeapi.co/graphql/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_grid_depth() -> usize {
    3
}

fn default_collection_depth() -> usize {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acquire_delay_ms: default_acquire_delay_ms(),
            catalog_limit: default_catalog_limit(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            grid_depth: default_grid_depth(),
            collection_depth: default_collection_depth(),
        }
    }
}

impl EngineConfig {
    /// Parse from YAML; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }

    /// Load a config file that must exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DexboardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content).map_err(|source| DexboardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load using the standard precedence from the current directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let project_dir = std::env::current_dir().ok();
        let global_dir = dirs::config_dir().map(|dir| dir.join("dexboard"));
        Self::load_with_dirs(explicit, project_dir.as_deref(), global_dir.as_deref())
    }

    /// Load with explicit project and global directories
    ///
    /// `project_dir` is the directory containing `.dexboard/`; `global_dir`
    /// contains `config.yml` directly.
    pub fn load_with_dirs(
        explicit: Option<&Path>,
        project_dir: Option<&Path>,
        global_dir: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "Loading config from explicit path");
            return Self::load_from_path(path);
        }

        let candidates: Vec<PathBuf> = project_dir
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
            .into_iter()
            .chain(global_dir.map(|dir| dir.join(CONFIG_FILE)))
            .collect();

        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Loading config");
                return Self::load_from_path(&candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn acquire_delay(&self) -> Duration {
        Duration::from_millis(self.acquire_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn grid_resolver(&self) -> AssetResolver {
        AssetResolver::with_depth(self.resolver.grid_depth)
    }

    pub fn collection_resolver(&self) -> AssetResolver {
        AssetResolver::with_depth(self.resolver.collection_depth)
    }
}
