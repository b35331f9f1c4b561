//! Landfall Batch-State Guard
//!
//! Tracks the lifecycle of ingested batch directories using nothing but
//! marker files. A batch directory is `Unmarked` when freshly landed,
//! `Transferred` once the producer has dropped the transferred marker, and
//! `Processed` once a downstream consumer has flagged it done. The
//! filesystem is the single source of truth: state is re-derived from marker
//! presence on every call and never cached.
//!
//! Downstream batch jobs use exactly four operations:
//!
//! - [`BatchGuard::expand_paths`] / [`BatchGuard::expand_transferred_paths`]
//!   to discover work,
//! - [`BatchGuard::list_non_empty_files`] to enumerate inputs, and
//! - [`BatchGuard::create_flag_file`] to mark completion.
//!
//! Two consumers can both observe a batch as "transferred, not processed"
//! and redundantly reprocess it before either writes the flag; the protocol
//! accepts that race and assumes downstream processing is idempotent.

mod glob;
mod state;

pub use state::{BatchGuard, BatchState, MarkerNames};
