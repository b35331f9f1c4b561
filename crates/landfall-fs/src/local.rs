//! Local filesystem implementation of [`FileStore`]

use crate::store::{DirEntry, FileStat, FileStore};
use async_trait::async_trait;
use landfall_common::Result;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// [`FileStore`] backed by the local filesystem via `tokio::fs`.
///
/// `create_new` maps to `O_CREAT | O_EXCL`, which is atomic on POSIX
/// filesystems and on NFS v3+.
#[derive(Debug, Clone, Default)]
pub struct LocalFileStore {
    name: String,
}

impl LocalFileStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            "local"
        } else {
            &self.name
        }
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = reader.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
            });
        }

        Ok(entries)
    }

    async fn stat(&self, path: &Path) -> Result<Option<FileStat>> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(Some(FileStat {
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        debug!(store = self.name(), path = %path.display(), bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn create_new(&self, path: &Path, data: &[u8]) -> Result<bool> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let open_result = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await;

        match open_result {
            Ok(file) => {
                let mut file = file;
                tokio::io::AsyncWriteExt::write_all(&mut file, data).await?;
                tokio::io::AsyncWriteExt::flush(&mut file).await?;
                debug!(store = self.name(), path = %path.display(), bytes = data.len(), "Created file");
                Ok(true)
            },
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
