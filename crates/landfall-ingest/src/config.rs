//! Ingestion run configuration
//!
//! One [`IngestConfig`] describes one ingestion unit: where its files come
//! from, which pattern they follow, and where they land. Loadable from TOML;
//! the optional `[remote]` section configures the distributed tier and can
//! be filled from the environment instead.

use crate::classify::ControlPattern;
use crate::layout::DestinationLayout;
use crate::pattern::FilePattern;
use landfall_common::{LandfallError, Result};
use landfall_fs::{Codec, S3Config};
use landfall_guard::MarkerNames;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Upstream system the files come from (e.g. "crm")
    pub source: String,
    /// Business domain within the source (e.g. "sales")
    pub domain: String,
    /// Table the files belong to; substituted for `{table}` in the pattern
    pub table: String,
    /// File-name pattern, e.g. `{table}{yyyyMMdd}.DAT`
    pub file_pattern: String,
    /// Directory scanned for incoming files (local tier)
    pub source_dir: PathBuf,
    /// Landing root on the distributed tier
    pub landing_root: PathBuf,
    /// Archive root on the local tier
    pub local_archive_root: PathBuf,
    /// Archive root on the distributed tier
    pub remote_archive_root: PathBuf,

    /// Wildcard expression overriding the conventional control-file filter
    #[serde(default)]
    pub control_pattern: Option<String>,

    /// Replaces the `{source}/{domain}/{table}` destination prefix
    #[serde(default)]
    pub destination_prefix: Option<PathBuf>,

    /// Compression codec for archive copies
    #[serde(default)]
    pub codec: Codec,

    /// Marker filenames used by the batch-state protocol
    #[serde(default)]
    pub markers: MarkerNames,

    /// Distributed-tier connection; absent means the landing and remote
    /// archive roots live on a locally mounted filesystem
    #[serde(default)]
    pub remote: Option<S3Config>,
}

impl IngestConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text).map_err(|e| {
            LandfallError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before any I/O happens.
    ///
    /// Compiles the file pattern and control pattern so bad expressions are
    /// rejected at configuration time rather than mid-run.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("source", &self.source),
            ("domain", &self.domain),
            ("table", &self.table),
        ] {
            if value.trim().is_empty() {
                return Err(LandfallError::Config(format!("{} must not be empty", field)));
            }
        }

        FilePattern::compile(&self.file_pattern)?;
        self.control_pattern()?;

        Ok(())
    }

    /// Compiled control-file filter (override or conventional default).
    pub fn control_pattern(&self) -> Result<ControlPattern> {
        match &self.control_pattern {
            Some(expr) => ControlPattern::from_wildcard(expr),
            None => Ok(ControlPattern::conventional()),
        }
    }

    /// Destination layout derived from this configuration.
    pub fn layout(&self) -> DestinationLayout {
        DestinationLayout {
            landing_root: self.landing_root.clone(),
            local_archive_root: self.local_archive_root.clone(),
            remote_archive_root: self.remote_archive_root.clone(),
            source: self.source.clone(),
            domain: self.domain.clone(),
            table: self.table.clone(),
            prefix_override: self.destination_prefix.clone(),
            codec: self.codec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_toml() -> String {
        r#"
            source = "crm"
            domain = "sales"
            table = "customer"
            file_pattern = "{table}{yyyyMMdd}.DAT"
            source_dir = "/incoming/crm"
            landing_root = "/landing"
            local_archive_root = "/archive"
            remote_archive_root = "/dfs-archive"
        "#
        .to_string()
    }

    #[test]
    fn test_parse_minimal_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest.toml");
        std::fs::write(&path, base_toml()).unwrap();

        let config = IngestConfig::from_toml_file(&path).unwrap();

        assert_eq!(config.table, "customer");
        assert_eq!(config.codec, Codec::Gzip);
        assert_eq!(config.markers, MarkerNames::default());
        assert!(config.remote.is_none());
        assert!(config.control_pattern.is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest.toml");
        let toml = format!(
            r#"{}
            control_pattern = "*.done"
            codec = "zstd"

            [markers]
            transferred = "_DONE"
            processed = "_CONSUMED"

            [remote]
            region = "us-east-1"
            bucket = "landing"
            access_key = "key"
            secret_key = "secret"
            path_style = true
            "#,
            base_toml()
        );
        std::fs::write(&path, toml).unwrap();

        let config = IngestConfig::from_toml_file(&path).unwrap();

        assert_eq!(config.codec, Codec::Zstd);
        assert_eq!(config.markers.transferred, "_DONE");
        assert_eq!(config.remote.as_ref().unwrap().bucket, "landing");
        assert!(config.control_pattern().unwrap().is_control("x.done"));
    }

    #[test]
    fn test_bad_pattern_rejected_at_validation() {
        let mut toml = base_toml();
        toml = toml.replace("{yyyyMMdd}", "{yyyyXX}");

        let config: IngestConfig = toml::from_str(&toml).unwrap();
        let err = config.validate().unwrap_err();

        assert!(matches!(err, LandfallError::UnsupportedTimestampField { .. }));
    }

    #[test]
    fn test_empty_table_rejected() {
        let toml = base_toml().replace("\"customer\"", "\"\"");
        let config: IngestConfig = toml::from_str(&toml).unwrap();

        assert!(matches!(config.validate(), Err(LandfallError::Config(_))));
    }
}
