//! Destination path construction
//!
//! Single source of truth for where a discovered file lands and where its
//! archive copies go. All writers derive paths through [`DestinationLayout`];
//! no path strings are assembled anywhere else.
//!
//! Standard layout:
//!
//! ```text
//! {landing_root}/{source}/{domain}/{table}/{year}/{month}/{day}/{name}
//! {archive_root}/{source}/{domain}/{table}/{year}/{month}/{day}/{name}{codec suffix}
//! ```
//!
//! A pattern with no timestamp fields omits the date subdirectories. An
//! optional prefix override replaces the `{source}/{domain}/{table}` portion
//! for non-standard layouts.

use crate::discover::DiscoveredFile;
use landfall_fs::Codec;
use std::path::{Path, PathBuf};

/// Deterministic mapping from discovered files to destinations
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    pub landing_root: PathBuf,
    pub local_archive_root: PathBuf,
    pub remote_archive_root: PathBuf,
    pub source: String,
    pub domain: String,
    pub table: String,
    /// Replaces `{source}/{domain}/{table}` when set
    pub prefix_override: Option<PathBuf>,
    pub codec: Codec,
}

impl DestinationLayout {
    fn table_prefix(&self) -> PathBuf {
        match &self.prefix_override {
            Some(prefix) => prefix.clone(),
            None => PathBuf::from(&self.source)
                .join(&self.domain)
                .join(&self.table),
        }
    }

    /// Date-partitioned directory for a file, relative to a root.
    fn partition_dir(&self, file: &DiscoveredFile) -> PathBuf {
        let mut dir = self.table_prefix();

        if let Some(date) = &file.date {
            for component in [date.year(), date.month(), date.day()].into_iter().flatten() {
                dir.push(component);
            }
        }

        dir
    }

    /// Landing destination on the distributed tier.
    pub fn landing_path(&self, file: &DiscoveredFile) -> PathBuf {
        self.landing_root.join(self.partition_dir(file)).join(&file.name)
    }

    /// Compressed archive destination on the local tier.
    pub fn local_archive_path(&self, file: &DiscoveredFile) -> PathBuf {
        self.archive_path(&self.local_archive_root, file)
    }

    /// Compressed archive destination on the distributed tier.
    pub fn remote_archive_path(&self, file: &DiscoveredFile) -> PathBuf {
        self.archive_path(&self.remote_archive_root, file)
    }

    fn archive_path(&self, root: &Path, file: &DiscoveredFile) -> PathBuf {
        root.join(self.partition_dir(file))
            .join(format!("{}{}", file.name, self.codec.suffix()))
    }
}
