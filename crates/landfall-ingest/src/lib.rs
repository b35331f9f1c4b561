//! Landfall Ingest Library
//!
//! Lands batches of externally produced flat files into a date-partitioned
//! storage layout. One ingestion run discovers candidate files in a source
//! directory, classifies away control files, copies each data file to its
//! landing destination on the distributed tier, and writes a compressed
//! archive copy to both tiers.
//!
//! # Example
//!
//! ```no_run
//! use landfall_ingest::{config::IngestConfig, pipeline::IngestPipeline};
//! use landfall_fs::LocalFileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::from_toml_file("ingest.toml")?;
//!     let local = Arc::new(LocalFileStore::new("local"));
//!     let remote = Arc::new(LocalFileStore::new("dfs"));
//!     let landed = IngestPipeline::new(config, local, remote).run().await?;
//!     println!("landed {} files", landed.len());
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod config;
pub mod discover;
pub mod layout;
pub mod pattern;
pub mod pipeline;
pub mod push;

pub use config::IngestConfig;
pub use pattern::FilePattern;
pub use pipeline::IngestPipeline;
