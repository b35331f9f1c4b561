//! Ingestion orchestrator
//!
//! Composes discovery and the push engine into one batch run. The run is
//! fail-fast: the first engine failure halts the batch so a systemic problem
//! (exhausted capacity, broken credentials) is not masked by continuing.
//! Files landed before the failure are logged as done; the unfinished
//! remainder is safe to retry because the engine's existence check skips
//! nothing silently and rejects already-landed destinations explicitly.

use crate::config::IngestConfig;
use crate::discover::find_files;
use crate::pattern::FilePattern;
use crate::push::PushEngine;
use chrono::Utc;
use landfall_common::Result;
use landfall_fs::FileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// One configured ingestion pipeline
pub struct IngestPipeline {
    config: IngestConfig,
    local: Arc<dyn FileStore>,
    remote: Arc<dyn FileStore>,
}

impl IngestPipeline {
    pub fn new(
        config: IngestConfig,
        local: Arc<dyn FileStore>,
        remote: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            config,
            local,
            remote,
        }
    }

    /// Run one ingestion batch; returns the landed paths.
    pub async fn run(&self) -> Result<Vec<PathBuf>> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let config = &self.config;

        info!(
            run_id = %run_id,
            source = %config.source,
            domain = %config.domain,
            table = %config.table,
            pattern = %config.file_pattern,
            source_dir = %config.source_dir.display(),
            landing_root = %config.landing_root.display(),
            local_archive_root = %config.local_archive_root.display(),
            remote_archive_root = %config.remote_archive_root.display(),
            codec = %config.codec,
            "Starting ingestion run"
        );

        // Configuration-level failures surface before any file is touched.
        let pattern = FilePattern::compile(&config.file_pattern)?;
        let control = config.control_pattern()?;

        let discovery = find_files(
            self.local.as_ref(),
            &config.source_dir,
            &config.table,
            &pattern,
            &control,
        )
        .await?;

        for control_file in &discovery.control_files {
            info!(run_id = %run_id, file = %control_file.display(), "Skipping control file");
        }

        let engine = PushEngine::new(
            self.local.clone(),
            self.remote.clone(),
            config.layout(),
            config.markers.clone(),
        );

        let mut landed = Vec::with_capacity(discovery.data_files.len());
        let mut bytes_copied = 0u64;

        for file in &discovery.data_files {
            match engine.push(file).await {
                Ok(record) => {
                    bytes_copied += record.bytes;
                    landed.push(record.landing);
                },
                Err(e) => {
                    error!(
                        run_id = %run_id,
                        source = %config.source,
                        domain = %config.domain,
                        table = %config.table,
                        file = %file.name,
                        files_landed = landed.len(),
                        error = %e,
                        "Ingestion run failed"
                    );
                    return Err(e);
                },
            }
        }

        let duration_secs = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;

        info!(
            run_id = %run_id,
            source = %config.source,
            domain = %config.domain,
            table = %config.table,
            files_landed = landed.len(),
            control_skipped = discovery.control_files.len(),
            bytes_copied,
            duration_secs,
            "Ingestion run complete"
        );

        Ok(landed)
    }
}
