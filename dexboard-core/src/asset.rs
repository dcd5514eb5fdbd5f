//! Display asset resolution
//!
//! Media payloads come straight from the catalog and are often incomplete:
//! the primary sprite can be null while a larger rendering exists under
//! `other`. The resolver walks a fixed fallback chain and takes the first
//! usable URL. Any parse or shape problem resolves to `None`, which the view
//! layer renders as [`PLACEHOLDER_ASSET`].

use serde_json::Value;

/// Asset shown when nothing resolves
pub const PLACEHOLDER_ASSET: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/items/poke-ball.png";

/// Resolved URL, or [`PLACEHOLDER_ASSET`] when there is none
pub fn placeholder_or(asset: Option<&str>) -> String {
    asset.unwrap_or(PLACEHOLDER_ASSET).to_string()
}

/// Candidate locations, tried in order
const FALLBACK_CHAIN: [&str; 3] = [
    "/front_default",
    "/other/official-artwork/front_default",
    "/other/home/front_default",
];

/// Resolves a display URL from a raw media payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetResolver {
    depth: usize,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::full()
    }
}

impl AssetResolver {
    /// Resolver trying the first `depth` links of the chain
    ///
    /// Depth is clamped to the chain length. Depth 0 resolves nothing.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth: depth.min(FALLBACK_CHAIN.len()),
        }
    }

    /// Every fallback enabled
    pub fn full() -> Self {
        Self::with_depth(FALLBACK_CHAIN.len())
    }

    /// Primary field only
    pub fn primary_only() -> Self {
        Self::with_depth(1)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn resolve(&self, payload: Option<&str>) -> Option<String> {
        let parsed: Value = serde_json::from_str(payload?).ok()?;

        FALLBACK_CHAIN[..self.depth]
            .iter()
            .filter_map(|pointer| parsed.pointer(pointer))
            .filter_map(Value::as_str)
            .find(|url| !url.is_empty())
            .map(str::to_string)
    }

    pub fn resolve_or_placeholder(&self, payload: Option<&str>) -> String {
        placeholder_or(self.resolve(payload).as_deref())
    }
}
