//! dexboard - terminal catalog browser
//!
//! Loads the catalog once per invocation, then renders one of the three
//! views. Acquisitions live only as long as the process.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dexboard_core::catalog::FileSource;
use dexboard_core::{CatalogSource, CatalogStatus, Engine, EngineConfig, EntryId};

mod views;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "dexboard", version, about = "Browse, acquire and tally catalog entries")]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Configuration file (defaults to .dexboard/config.yml, then the user config dir)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Read the catalog from a saved query response instead of the endpoint
    #[clap(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the catalog grid
    Browse {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show the category distribution
    Stats {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Acquire entries, then show the collection
    Acquire {
        /// Entry ids to acquire
        ids: Vec<EntryId>,

        /// Acquire every entry in the catalog
        #[clap(long, conflicts_with = "ids")]
        all: bool,
    },
}

/// Initialize tracing from the --log-level flag
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // views own stdout
        .init();
}

fn catalog_source(
    catalog: Option<PathBuf>,
    config: &EngineConfig,
) -> Result<Box<dyn CatalogSource>> {
    match catalog {
        Some(path) => Ok(Box::new(FileSource::new(path))),
        None => remote_source(config),
    }
}

#[cfg(feature = "remote")]
fn remote_source(config: &EngineConfig) -> Result<Box<dyn CatalogSource>> {
    let source = dexboard_core::catalog::GraphqlSource::from_config(config)
        .context("Failed to set up the remote catalog source")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "remote"))]
fn remote_source(_config: &EngineConfig) -> Result<Box<dyn CatalogSource>> {
    bail!("Remote catalog support is not enabled. Rebuild with --features remote or pass --catalog <FILE>")
}

async fn load_catalog(engine: &mut Engine, source: &dyn CatalogSource) -> Result<()> {
    eprintln!("Loading catalog from {}...", source.describe());
    match engine.load_from(source).await {
        CatalogStatus::Ready(entries) => {
            debug!(entries = entries.len(), "Catalog loaded");
            Ok(())
        }
        CatalogStatus::Failed(message) => bail!("Error loading catalog: {message}"),
        CatalogStatus::Loading => bail!("Catalog load did not finish"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let config = EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "Configuration resolved");

    let source = catalog_source(cli.catalog, &config)?;
    let mut engine = Engine::new(&config);
    load_catalog(&mut engine, source.as_ref()).await?;

    let result = match cli.command {
        Command::Browse { json } => views::browse(&engine.snapshot(), json),
        Command::Stats { json } => views::stats(&engine.snapshot(), json),
        Command::Acquire { ids, all } => views::acquire(&mut engine, ids, all).await,
    };

    engine.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_acquire_ids_with_global_flags() {
        let cli = Cli::try_parse_from([
            "dexboard",
            "acquire",
            "1",
            "4",
            "--catalog",
            "saved.json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.catalog, Some(PathBuf::from("saved.json")));
        assert!(matches!(cli.log_level, LogLevel::Debug));
        match cli.command {
            Command::Acquire { ids, all } => {
                assert_eq!(ids, vec![1, 4]);
                assert!(!all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_acquire_all_conflicts_with_ids() {
        assert!(Cli::try_parse_from(["dexboard", "acquire", "--all", "3"]).is_err());
        assert!(Cli::try_parse_from(["dexboard", "acquire", "--all"]).is_ok());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dexboard", "stats"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Warn));
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Command::Stats { json: false }));
    }
}
