//! Source-directory discovery
//!
//! One non-recursive scan of the source directory. Each entry is first
//! checked against the control pattern, then against the compiled file
//! pattern; entries matching neither belong to a different ingestion unit
//! and are skipped silently.

use crate::classify::ControlPattern;
use crate::pattern::{DatePartition, FilePattern};
use landfall_common::Result;
use landfall_fs::FileStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One data file found by a discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Timestamp fields extracted by the file pattern, when it has any
    pub date: Option<DatePartition>,
}

/// Result of scanning one source directory
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub control_files: Vec<PathBuf>,
    pub data_files: Vec<DiscoveredFile>,
}

/// Scan a directory's immediate entries for control and data files.
///
/// Ordering of the returned data files is unspecified.
pub async fn find_files(
    store: &dyn FileStore,
    dir: &Path,
    table: &str,
    pattern: &FilePattern,
    control: &ControlPattern,
) -> Result<Discovery> {
    let matcher = pattern.matcher(table)?;
    let mut discovery = Discovery::default();

    for entry in store.list_dir(dir).await? {
        if entry.is_dir {
            continue;
        }

        if control.is_control(&entry.name) {
            discovery.control_files.push(entry.path);
            continue;
        }

        match matcher.match_file(&entry.name) {
            Some(date) => discovery.data_files.push(DiscoveredFile {
                path: entry.path,
                name: entry.name,
                size: entry.size,
                date,
            }),
            None => {
                debug!(file = %entry.name, "Entry matches neither pattern, skipping");
            },
        }
    }

    Ok(discovery)
}
