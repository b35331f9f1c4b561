//! Batch directory state machine

use crate::glob::expand_glob;
use landfall_common::Result;
use landfall_fs::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Marker filenames encoding batch lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerNames {
    /// Written by the producer once a batch is completely ingested
    pub transferred: String,
    /// Written by a downstream consumer once a batch is fully processed
    pub processed: String,
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self {
            transferred: ".transferred".to_string(),
            processed: ".processed".to_string(),
        }
    }
}

impl MarkerNames {
    pub fn is_marker(&self, filename: &str) -> bool {
        filename == self.transferred || filename == self.processed
    }
}

/// Lifecycle state of one batch directory, derived from marker presence.
///
/// `Processed` dominates: a directory carrying both markers is processed.
/// Transitions never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Unmarked,
    Transferred,
    Processed,
}

impl BatchState {
    pub fn as_str(&self) -> &str {
        match self {
            BatchState::Unmarked => "unmarked",
            BatchState::Transferred => "transferred",
            BatchState::Processed => "processed",
        }
    }
}

/// Marker-file coordination over batch directories.
///
/// Holds no state of its own beyond the store handle and marker names;
/// every operation re-reads the filesystem.
pub struct BatchGuard {
    store: Arc<dyn FileStore>,
    markers: MarkerNames,
}

impl BatchGuard {
    pub fn new(store: Arc<dyn FileStore>, markers: MarkerNames) -> Self {
        Self { store, markers }
    }

    pub fn markers(&self) -> &MarkerNames {
        &self.markers
    }

    /// Derive the state of a single batch directory.
    pub async fn state_of(&self, dir: &Path) -> Result<BatchState> {
        if self.store.exists(&dir.join(&self.markers.processed)).await? {
            Ok(BatchState::Processed)
        } else if self.store.exists(&dir.join(&self.markers.transferred)).await? {
            Ok(BatchState::Transferred)
        } else {
            Ok(BatchState::Unmarked)
        }
    }

    /// Resolve a glob to batch directories that are not yet processed.
    ///
    /// Keeps only directories; excludes any carrying the processed marker.
    /// Order is the natural listing order of the store; callers needing
    /// determinism must sort.
    pub async fn expand_paths(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();

        for path in expand_glob(self.store.as_ref(), pattern).await? {
            match self.store.stat(&path).await? {
                Some(stat) if stat.is_dir => {},
                _ => continue,
            }
            if self.state_of(&path).await? != BatchState::Processed {
                dirs.push(path);
            }
        }

        debug!(pattern, count = dirs.len(), "Expanded batch paths");
        Ok(dirs)
    }

    /// As [`expand_paths`](Self::expand_paths), further restricted to
    /// directories carrying the transferred marker (ready for consumption).
    pub async fn expand_transferred_paths(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();

        for path in self.expand_paths(pattern).await? {
            if self.state_of(&path).await? == BatchState::Transferred {
                dirs.push(path);
            }
        }

        Ok(dirs)
    }

    /// List immediate regular files with size > 0 across the given
    /// directories. Marker files and subdirectories are excluded regardless
    /// of size.
    pub async fn list_non_empty_files(&self, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for dir in dirs {
            for entry in self.store.list_dir(dir).await? {
                if entry.is_dir || entry.size == 0 || self.markers.is_marker(&entry.name) {
                    continue;
                }
                files.push(entry.path);
            }
        }

        Ok(files)
    }

    /// Idempotently create the processed marker in each given directory.
    ///
    /// A directory that is already processed is left untouched; only
    /// structural failures (unreachable store, write errors) raise.
    pub async fn create_flag_file(&self, dirs: &[PathBuf]) -> Result<()> {
        for dir in dirs {
            let marker = dir.join(&self.markers.processed);
            let created = self.store.create_new(&marker, b"").await?;
            if created {
                info!(dir = %dir.display(), "Marked batch processed");
            } else {
                debug!(dir = %dir.display(), "Batch already marked processed");
            }
        }

        Ok(())
    }
}
