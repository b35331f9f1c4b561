//! Landfall - flat-file ingestion and batch coordination tool

use anyhow::{Context, Result};
use clap::Parser;
use landfall_common::logging::{init_logging, LogConfig, LogLevel};
use landfall_fs::{FileStore, LocalFileStore, S3Config, S3FileStore};
use landfall_guard::{BatchGuard, MarkerNames};
use landfall_ingest::{IngestConfig, IngestPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "landfall")]
#[command(author, version, about = "Flat-file ingestion and batch coordination tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run one ingestion batch
    Ingest {
        /// Path to the ingestion TOML configuration
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List batch directories ready for consumption (transferred, not processed)
    Ready {
        /// Glob over batch directories, e.g. "/landing/crm/sales/customer/*/*/*"
        glob: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List batch directories not yet processed (any transfer state)
    Pending {
        /// Glob over batch directories
        glob: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List non-empty input files across ready batch directories
    Inputs {
        /// Glob over batch directories
        glob: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Mark batch directories as processed
    MarkProcessed {
        /// Batch directories to flag
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Operate on the distributed tier (S3, configured from the environment)
    /// instead of the local filesystem
    #[arg(long)]
    remote: bool,
}

impl StoreArgs {
    fn guard(&self) -> Result<BatchGuard> {
        let store: Arc<dyn FileStore> = if self.remote {
            Arc::new(S3FileStore::new(S3Config::from_env()?))
        } else {
            Arc::new(LocalFileStore::new("local"))
        };
        Ok(BatchGuard::new(store, MarkerNames::default()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_level(log_level)
        .with_file_prefix("landfall");

    init_logging(&log_config)?;

    match cli.command {
        Command::Ingest { config } => {
            let config = IngestConfig::from_toml_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;

            let local: Arc<dyn FileStore> = Arc::new(LocalFileStore::new("local"));
            let remote: Arc<dyn FileStore> = match &config.remote {
                Some(s3) => Arc::new(S3FileStore::new(s3.clone())),
                None => Arc::new(LocalFileStore::new("dfs")),
            };

            let landed = IngestPipeline::new(config, local, remote).run().await?;
            for path in &landed {
                println!("{}", path.display());
            }
            info!(files_landed = landed.len(), "Ingestion complete");
        },
        Command::Ready { glob, store } => {
            for dir in store.guard()?.expand_transferred_paths(&glob).await? {
                println!("{}", dir.display());
            }
        },
        Command::Pending { glob, store } => {
            for dir in store.guard()?.expand_paths(&glob).await? {
                println!("{}", dir.display());
            }
        },
        Command::Inputs { glob, store } => {
            let guard = store.guard()?;
            let dirs = guard.expand_transferred_paths(&glob).await?;
            for file in guard.list_non_empty_files(&dirs).await? {
                println!("{}", file.display());
            }
        },
        Command::MarkProcessed { dirs, store } => {
            store.guard()?.create_flag_file(&dirs).await?;
            info!(batches = dirs.len(), "Marked processed");
        },
    }

    Ok(())
}
