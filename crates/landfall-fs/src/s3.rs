//! S3-compatible implementation of [`FileStore`] (the distributed tier)
//!
//! Objects live under `{prefix}/{path}` in a single bucket. Directories are
//! emulated the usual way: a path is a directory if any key exists under
//! `path/`. Atomic create-if-absent uses a conditional put
//! (`If-None-Match: *`), which the protocol relies on for marker files and
//! landing destinations.

use crate::store::{DirEntry, FileStat, FileStore};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use landfall_common::{LandfallError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Connection settings for the distributed tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
}

impl S3Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "landfall-data".to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY")
                .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }

    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            bucket: bucket.into(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            path_style: true,
        }
    }
}

/// [`FileStore`] backed by an S3-compatible object store
#[derive(Clone)]
pub struct S3FileStore {
    client: Client,
    bucket: String,
    name: String,
}

impl S3FileStore {
    pub fn new(config: S3Config) -> Self {
        debug!("Initializing S3 store with config: {:?}", config);

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "landfall-fs",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("S3 store initialized for bucket: {}", config.bucket);

        Self {
            client,
            bucket: config.bucket,
            name: "s3".to_string(),
        }
    }

    /// Render a path as an object key (forward slashes, no leading slash).
    fn key_for(path: &Path) -> String {
        path.components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn storage_err(context: &str, e: impl std::fmt::Display) -> LandfallError {
        LandfallError::Storage(format!("{}: {}", context, e))
    }

    fn is_not_found(message: &str) -> bool {
        message.contains("NotFound") || message.contains("NoSuchKey") || message.contains("404")
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let key = Self::key_for(dir);
        let prefix = if key.is_empty() { String::new() } else { format!("{}/", key) };

        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix.as_str())
                .delimiter("/");
            if let Some(token) = &continuation {
                request = request.continuation_token(token.as_str());
            }

            let response = request
                .send()
                .await
                .map_err(|e| Self::storage_err("Failed to list S3 objects", e))?;

            for common in response.common_prefixes() {
                if let Some(sub_prefix) = common.prefix() {
                    let name = sub_prefix
                        .trim_end_matches('/')
                        .rsplit('/')
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    entries.push(DirEntry {
                        path: dir.join(&name),
                        name,
                        is_dir: true,
                        size: 0,
                    });
                }
            }

            for object in response.contents() {
                let Some(object_key) = object.key() else { continue };
                if object_key == prefix {
                    // Placeholder object for the directory itself.
                    continue;
                }
                let name = object_key.rsplit('/').next().unwrap_or_default().to_string();
                entries.push(DirEntry {
                    path: dir.join(&name),
                    name,
                    is_dir: false,
                    size: object.size().unwrap_or(0).max(0) as u64,
                });
            }

            continuation = response.next_continuation_token().map(|t| t.to_string());
            if continuation.is_none() {
                break;
            }
        }

        Ok(entries)
    }

    async fn stat(&self, path: &Path) -> Result<Option<FileStat>> {
        let key = Self::key_for(path);

        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(head) => {
                return Ok(Some(FileStat {
                    is_dir: false,
                    size: head.content_length().unwrap_or(0).max(0) as u64,
                }));
            },
            Err(e) => {
                let message = e.to_string();
                if !Self::is_not_found(&message) {
                    return Err(Self::storage_err("Failed to stat S3 object", message));
                }
            },
        }

        // No object at the key itself; the path is a directory if any key
        // lives underneath it.
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(format!("{}/", key))
            .max_keys(1)
            .send()
            .await
            .map_err(|e| Self::storage_err("Failed to probe S3 prefix", e))?;

        if response.key_count().unwrap_or(0) > 0 {
            Ok(Some(FileStat { is_dir: true, size: 0 }))
        } else {
            Ok(None)
        }
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let key = Self::key_for(path);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| Self::storage_err(&format!("Failed to download s3://{}/{}", self.bucket, key), e))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Self::storage_err("Failed to read S3 response body", e))?
            .into_bytes()
            .to_vec();

        debug!("Downloaded {} bytes from s3://{}/{}", data.len(), self.bucket, key);

        Ok(data)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let key = Self::key_for(path);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| Self::storage_err(&format!("Failed to upload s3://{}/{}", self.bucket, key), e))?;

        debug!("Uploaded {} bytes to s3://{}/{}", data.len(), self.bucket, key);

        Ok(())
    }

    async fn create_new(&self, path: &Path, data: &[u8]) -> Result<bool> {
        let key = Self::key_for(path);

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .if_none_match("*")
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = e.to_string();
                if message.contains("PreconditionFailed") || message.contains("412") {
                    Ok(false)
                } else {
                    Err(Self::storage_err(
                        &format!("Failed conditional put s3://{}/{}", self.bucket, key),
                        message,
                    ))
                }
            },
        }
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        let key = Self::key_for(path);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| Self::storage_err(&format!("Failed to delete s3://{}/{}", self.bucket, key), e))?;

        Ok(())
    }
}
