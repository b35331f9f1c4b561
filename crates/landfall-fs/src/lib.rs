//! Landfall Filesystem Library
//!
//! Storage-tier abstraction for the Landfall pipeline. Every component that
//! touches storage does so through the [`FileStore`] trait, so the same code
//! serves a local directory tree and a distributed object store.
//!
//! - [`store::FileStore`]: list/stat/read/write/atomic-create/delete
//! - [`local::LocalFileStore`]: `tokio::fs` implementation
//! - [`s3::S3FileStore`]: S3-compatible implementation (the distributed tier)
//! - [`codec::Codec`]: pluggable compression for archive copies

pub mod codec;
pub mod local;
pub mod s3;
pub mod store;

pub use codec::Codec;
pub use local::LocalFileStore;
pub use s3::{S3Config, S3FileStore};
pub use store::{DirEntry, FileStat, FileStore};
