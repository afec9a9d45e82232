//! JSON results sink
//!
//! JSON arrays cannot be appended to at the byte level, so every append
//! reads the existing array, extends it, and rewrites the whole file through
//! a temporary file and a rename.

use crate::output::traits::{ensure_parent_dir, run_blocking, OutputResult, PathLocks, ResultSink};
use crate::output::{CrawlResult, OutputFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// [`ResultSink`] maintaining a pretty-printed JSON array
#[derive(Debug, Default)]
pub struct JsonSink {
    locks: PathLocks,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reads every result stored at `path`; a missing or blank file holds none
pub fn read_results(path: &Path) -> OutputResult<Vec<CrawlResult>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&text)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn rewrite(path: &Path, new_results: &[CrawlResult]) -> OutputResult<()> {
    ensure_parent_dir(path)?;

    let mut all = read_results(path)?;
    all.extend_from_slice(new_results);

    let json = serde_json::to_string_pretty(&all)?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

#[async_trait]
impl ResultSink for JsonSink {
    async fn append(&self, path: &Path, results: &[CrawlResult]) -> OutputResult<()> {
        if results.is_empty() {
            return Ok(());
        }

        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().await;

        let count = results.len();
        let target = path.to_path_buf();
        let results = results.to_vec();
        run_blocking(move || rewrite(&target, &results)).await?;

        tracing::debug!("Appended {} result(s) to {}", count, path.display());
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
