//! Landfall Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Landfall project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Landfall
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing setup for all binaries
//! - **Checksums**: File integrity digests recorded for landed files
//!
//! # Example
//!
//! ```no_run
//! use landfall_common::{Result, LandfallError};
//! use landfall_common::checksum::{compute_file_checksum, ChecksumAlgorithm};
//!
//! fn digest(path: &str) -> Result<()> {
//!     let checksum = compute_file_checksum(path, ChecksumAlgorithm::Sha256)?;
//!     println!("File checksum: {}", checksum);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod wildcard;

// Re-export commonly used types
pub use error::{LandfallError, Result};
