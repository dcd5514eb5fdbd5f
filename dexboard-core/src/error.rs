//! Error types for the dexboard engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexboardError {
    /// Failed to read a configuration file
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for `EngineConfig`
    #[error("Failed to parse config file: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Failed to read a saved catalog response
    #[error("Failed to read catalog file: {path}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog response did not match the expected wire shape
    #[error("Failed to parse catalog response")]
    CatalogParse(#[from] serde_json::Error),

    /// The catalog endpoint could not be reached
    #[error("Catalog request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The catalog endpoint answered with a non-success status
    #[error("Catalog request failed: HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// The catalog query itself was rejected
    #[error("Catalog query returned errors: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, DexboardError>;

impl DexboardError {
    /// The error followed by each of its sources, `: `-separated
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
