//! Push/archive engine
//!
//! Copies one discovered data file to its landing destination on the
//! distributed tier and writes a compressed archive copy to both tiers.
//!
//! The landing destination's existence is the commit point. A file is
//! rejected with `DestinationExists` when the landing path (or the landing
//! batch directory's transferred marker) is already present; that check is
//! the sole double-ingestion guard, and it is what makes re-running a
//! partially failed batch safe. Write order is landing copy, local archive,
//! remote archive: a resumed run only ever consults the landing path, and
//! archive writes are plain overwrites so a half-written archive cannot
//! block a retry.
//!
//! Nothing is rolled back on failure; the engine aborts that file and the
//! orchestrator halts the batch.

use crate::discover::DiscoveredFile;
use crate::layout::DestinationLayout;
use landfall_common::checksum::sha256_hex;
use landfall_common::{LandfallError, Result};
use landfall_fs::FileStore;
use landfall_guard::MarkerNames;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one successful push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub source: PathBuf,
    pub landing: PathBuf,
    pub local_archive: PathBuf,
    pub remote_archive: PathBuf,
    /// Raw size of the landed file
    pub bytes: u64,
    /// Size of the compressed archive copy
    pub compressed_bytes: u64,
    /// SHA-256 of the raw bytes, for archive verification
    pub sha256: String,
}

/// Per-file copy/archive engine
pub struct PushEngine {
    local: Arc<dyn FileStore>,
    remote: Arc<dyn FileStore>,
    layout: DestinationLayout,
    markers: MarkerNames,
}

impl PushEngine {
    pub fn new(
        local: Arc<dyn FileStore>,
        remote: Arc<dyn FileStore>,
        layout: DestinationLayout,
        markers: MarkerNames,
    ) -> Self {
        Self {
            local,
            remote,
            layout,
            markers,
        }
    }

    /// Land one file and write its archive copies.
    ///
    /// Fails with `DestinationExists` rather than overwriting; any other
    /// failure aborts only this file's transfer, leaving whatever was
    /// written in place for inspection.
    pub async fn push(&self, file: &DiscoveredFile) -> Result<TransferRecord> {
        let landing = self.layout.landing_path(file);

        if self.remote.exists(&landing).await? {
            return Err(LandfallError::DestinationExists(landing));
        }

        if let Some(batch_dir) = landing.parent() {
            let transferred = batch_dir.join(&self.markers.transferred);
            if self.remote.exists(&transferred).await? {
                return Err(LandfallError::DestinationExists(transferred));
            }
        }

        let data = self.local.read(&file.path).await?;
        let sha256 = sha256_hex(&data);

        // Atomic create: a concurrent run racing on the same destination
        // loses here rather than double-copying.
        if !self.remote.create_new(&landing, &data).await? {
            return Err(LandfallError::DestinationExists(landing));
        }

        debug!(
            file = %file.name,
            landing = %landing.display(),
            bytes = data.len(),
            "Landed file"
        );

        let compressed = self.layout.codec.compress(&data)?;

        let local_archive = self.layout.local_archive_path(file);
        self.local.write(&local_archive, &compressed).await?;

        let remote_archive = self.layout.remote_archive_path(file);
        self.remote.write(&remote_archive, &compressed).await?;

        info!(
            file = %file.name,
            landing = %landing.display(),
            bytes = data.len(),
            compressed_bytes = compressed.len(),
            "Transferred file"
        );

        Ok(TransferRecord {
            source: file.path.clone(),
            landing,
            local_archive,
            remote_archive,
            bytes: data.len() as u64,
            compressed_bytes: compressed.len() as u64,
            sha256,
        })
    }
}
