//! Storage abstraction consumed by the ingestion pipeline and batch guard
//!
//! Both storage tiers (local disk and the distributed filesystem) are
//! accessed through [`FileStore`]. Any operation may block on network
//! latency; nothing here retries. Failures surface immediately and the
//! orchestration layer decides what to do.

use async_trait::async_trait;
use landfall_common::Result;
use std::path::{Path, PathBuf};

/// Metadata for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    /// Size in bytes; zero for directories
    pub size: u64,
}

/// One immediate entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Final path component
    pub name: String,
    /// Full path of the entry
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

/// Unified interface over a storage tier.
///
/// Implementations must provide atomic create-if-absent semantics for
/// [`create_new`](FileStore::create_new); that single guarantee is what the
/// marker-file coordination protocol and the landing-path commit point are
/// built on.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Name of the configured store, used for logging only.
    fn name(&self) -> &str;

    /// List the immediate entries of a directory (no recursion).
    async fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    /// Stat a path. Returns `None` if nothing exists there.
    async fn stat(&self, path: &Path) -> Result<Option<FileStat>>;

    /// Read the full contents of a file.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, creating parent directories and overwriting any
    /// existing content.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Atomically create a file if and only if it does not already exist.
    ///
    /// Returns `true` if this call created the file, `false` if the path
    /// was already present. Callers decide whether "already present" is a
    /// no-op (marker files) or a hard stop (landing destinations).
    async fn create_new(&self, path: &Path, data: &[u8]) -> Result<bool>;

    /// Delete a file.
    async fn delete(&self, path: &Path) -> Result<()>;

    /// Whether anything exists at the path.
    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.stat(path).await?.is_some())
    }
}
