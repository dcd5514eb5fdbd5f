//! Concrete catalog sources

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{normalize, parse_response, CatalogEntry, CatalogSource};
use crate::{DexboardError, Result};

/// Reads a saved catalog query response from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DexboardError::CatalogRead {
                path: self.path.clone(),
                source,
            })?;

        let entries = normalize(parse_response(&body)?, limit);
        debug!(path = %self.path.display(), entries = entries.len(), "Loaded catalog file");
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Posts the catalog query to a GraphQL endpoint
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct GraphqlSource {
    endpoint: String,
    client: reqwest::Client,
}

#[cfg(feature = "remote")]
impl GraphqlSource {
    pub fn new(endpoint: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .user_agent(concat!("dexboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DexboardError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { endpoint, client })
    }

    /// Build a source from the endpoint and timeout in `config`
    pub fn from_config(config: &crate::EngineConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    fn transport_error(&self, error: reqwest::Error) -> DexboardError {
        DexboardError::Transport {
            endpoint: self.endpoint.clone(),
            message: error.to_string(),
        }
    }
}

#[cfg(feature = "remote")]
#[async_trait]
impl CatalogSource for GraphqlSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        let body = serde_json::json!({ "query": super::catalog_query(limit) });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexboardError::HttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let entries = normalize(parse_response(&text)?, limit);
        debug!(endpoint = %self.endpoint, entries = entries.len(), "Fetched remote catalog");
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("endpoint {}", self.endpoint)
    }
}
