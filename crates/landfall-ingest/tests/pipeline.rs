//! End-to-end ingestion pipeline tests over temporary directory trees.
//!
//! Both storage tiers are local stores here; the remote tier's root lives in
//! its own temp directory so the two tiers cannot alias.

use landfall_fs::{Codec, FileStore, LocalFileStore};
use landfall_guard::{BatchGuard, BatchState, MarkerNames};
use landfall_ingest::config::IngestConfig;
use landfall_ingest::pipeline::IngestPipeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct Harness {
    _source: tempfile::TempDir,
    _dest: tempfile::TempDir,
    config: IngestConfig,
}

impl Harness {
    fn new() -> Self {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let config = IngestConfig {
            source: "crm".to_string(),
            domain: "sales".to_string(),
            table: "customer".to_string(),
            file_pattern: "{table}{yyyyMMdd}.DAT".to_string(),
            source_dir: source.path().to_path_buf(),
            landing_root: dest.path().join("landing"),
            local_archive_root: dest.path().join("archive"),
            remote_archive_root: dest.path().join("dfs-archive"),
            control_pattern: None,
            destination_prefix: None,
            codec: Codec::Gzip,
            markers: MarkerNames::default(),
            remote: None,
        };

        Self {
            _source: source,
            _dest: dest,
            config,
        }
    }

    fn write_source(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.config.source_dir.join(name), contents).unwrap();
    }

    fn pipeline(&self) -> IngestPipeline {
        let local: Arc<dyn FileStore> = Arc::new(LocalFileStore::new("local"));
        let remote: Arc<dyn FileStore> = Arc::new(LocalFileStore::new("dfs"));
        IngestPipeline::new(self.config.clone(), local, remote)
    }

    fn partition_dir(&self) -> PathBuf {
        self.config
            .landing_root
            .join("crm/sales/customer/2014/10/10")
    }
}

#[tokio::test]
async fn test_ingest_lands_data_and_skips_control() {
    let harness = Harness::new();
    harness.write_source("customer20141010.DAT", b"0123456789");
    harness.write_source("customer.ctl", b"");

    let landed = harness.pipeline().run().await.unwrap();

    // Exactly one file landed, at its date-partitioned destination.
    let expected = harness.partition_dir().join("customer20141010.DAT");
    assert_eq!(landed, vec![expected.clone()]);
    assert_eq!(std::fs::read(&expected).unwrap(), b"0123456789");

    // The control file was not copied anywhere.
    assert!(!harness.partition_dir().join("customer.ctl").exists());

    // Compressed archive copies exist on both tiers.
    let local_archive = harness
        .config
        .local_archive_root
        .join("crm/sales/customer/2014/10/10/customer20141010.DAT.gz");
    let remote_archive = harness
        .config
        .remote_archive_root
        .join("crm/sales/customer/2014/10/10/customer20141010.DAT.gz");

    for archive in [&local_archive, &remote_archive] {
        let compressed = std::fs::read(archive).unwrap();
        assert_eq!(Codec::Gzip.decompress(&compressed).unwrap(), b"0123456789");
    }
}

#[tokio::test]
async fn test_rerun_rejects_already_landed_file() {
    let harness = Harness::new();
    harness.write_source("customer20141010.DAT", b"0123456789");

    harness.pipeline().run().await.unwrap();
    let err = harness.pipeline().run().await.unwrap_err();

    assert!(matches!(
        err,
        landfall_common::LandfallError::DestinationExists(_)
    ));

    // The landed copy is untouched.
    let landed = harness.partition_dir().join("customer20141010.DAT");
    assert_eq!(std::fs::read(&landed).unwrap(), b"0123456789");
}

#[tokio::test]
async fn test_run_fails_fast_on_bad_pattern() {
    let mut harness = Harness::new();
    harness.config.file_pattern = "{table}{yyyyNN}.DAT".to_string();
    harness.write_source("customer20141010.DAT", b"0123456789");

    let err = harness.pipeline().run().await.unwrap_err();
    assert!(err.is_pattern_error());

    // Nothing was copied.
    assert!(!harness.config.landing_root.exists());
}

#[tokio::test]
async fn test_multiple_days_partition_separately() {
    let harness = Harness::new();
    harness.write_source("customer20141010.DAT", b"day one");
    harness.write_source("customer20141011.DAT", b"day two");

    let mut landed = harness.pipeline().run().await.unwrap();
    landed.sort();

    assert_eq!(
        landed,
        vec![
            harness
                .config
                .landing_root
                .join("crm/sales/customer/2014/10/10/customer20141010.DAT"),
            harness
                .config
                .landing_root
                .join("crm/sales/customer/2014/10/11/customer20141011.DAT"),
        ]
    );
}

#[tokio::test]
async fn test_landed_batch_flows_through_guard() {
    let harness = Harness::new();
    harness.write_source("customer20141010.DAT", b"0123456789");
    harness.pipeline().run().await.unwrap();

    let batch_dir = harness.partition_dir();
    let store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new("dfs"));
    let guard = BatchGuard::new(store, MarkerNames::default());

    // Freshly landed: visible to expand_paths but not yet transferred.
    let glob = format!("{}/*", batch_dir.parent().unwrap().display());
    assert_eq!(guard.expand_paths(&glob).await.unwrap(), vec![batch_dir.clone()]);
    assert!(guard.expand_transferred_paths(&glob).await.unwrap().is_empty());

    // Producer marks the batch transferred; it becomes consumable.
    mark(&batch_dir, ".transferred");
    assert_eq!(
        guard.expand_transferred_paths(&glob).await.unwrap(),
        vec![batch_dir.clone()]
    );
    assert_eq!(
        guard.list_non_empty_files(&[batch_dir.clone()]).await.unwrap(),
        vec![batch_dir.join("customer20141010.DAT")]
    );

    // Consumer flags it processed; it disappears from both expansions.
    guard.create_flag_file(&[batch_dir.clone()]).await.unwrap();
    assert_eq!(guard.state_of(&batch_dir).await.unwrap(), BatchState::Processed);
    assert!(guard.expand_paths(&glob).await.unwrap().is_empty());
    assert!(guard.expand_transferred_paths(&glob).await.unwrap().is_empty());
}

fn mark(dir: &Path, marker: &str) {
    std::fs::write(dir.join(marker), b"").unwrap();
}
