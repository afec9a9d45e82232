//! Result sink trait and error types
//!
//! This module defines the interface every results writer implements and the
//! per-path lock registry the writers use to serialize access.

use crate::output::{CrawlResult, OutputFormat};
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only writer of crawl results
///
/// Implementations must be safe under concurrent callers targeting the same
/// path: calls are serialized, and each call writes all of its records or
/// none of them. Missing parent directories are created.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Appends `results` to the file at `path`
    async fn append(&self, path: &Path, results: &[CrawlResult]) -> OutputResult<()>;

    /// The format this sink writes
    fn format(&self) -> OutputFormat;
}

/// One async mutex per output path
#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl PathLocks {
    pub(crate) fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks.entry(path.to_path_buf()).or_default().clone()
    }
}

/// Creates the parent directory of `path` if it is missing
pub(crate) fn ensure_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Runs a blocking write on the blocking pool while the caller holds the path lock
pub(crate) async fn run_blocking<F>(write: F) -> OutputResult<()>
where
    F: FnOnce() -> OutputResult<()> + Send + 'static,
{
    tokio::task::spawn_blocking(write)
        .await
        .map_err(|e| OutputError::Write(format!("writer task failed: {}", e)))?
}
