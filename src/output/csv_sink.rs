//! CSV results sink
//!
//! Rows are appended to the file. The header row is written only when the
//! file is new (or empty), so repeated appends produce a single header.

use crate::output::traits::{
    ensure_parent_dir, run_blocking, OutputError, OutputResult, PathLocks, ResultSink,
};
use crate::output::{CrawlResult, OutputFormat};
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Uri")]
    uri: String,
    #[serde(rename = "ParentUri")]
    parent_uri: String,
    #[serde(rename = "Links")]
    links: String,
    #[serde(rename = "CrawlTime")]
    crawl_time_ms: u64,
    #[serde(rename = "DepthLevel")]
    depth: u32,
}

impl From<&CrawlResult> for CsvRow {
    fn from(result: &CrawlResult) -> Self {
        Self {
            uri: result.uri.to_string(),
            parent_uri: result
                .parent_uri
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            links: result
                .links
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(","),
            crawl_time_ms: result.crawl_time_ms,
            depth: result.depth,
        }
    }
}

/// [`ResultSink`] writing one CSV row per result
#[derive(Debug, Default)]
pub struct CsvSink {
    locks: PathLocks,
}

impl CsvSink {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Encodes all rows in memory, then appends them with a single write
fn write_rows(path: &Path, results: &[CrawlResult]) -> OutputResult<()> {
    ensure_parent_dir(path)?;

    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(Vec::new());
    for result in results {
        writer.serialize(CsvRow::from(result))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&buffer)?;
    file.flush()?;

    Ok(())
}

#[async_trait]
impl ResultSink for CsvSink {
    async fn append(&self, path: &Path, results: &[CrawlResult]) -> OutputResult<()> {
        if results.is_empty() {
            return Ok(());
        }

        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().await;

        let count = results.len();
        let target = path.to_path_buf();
        let results = results.to_vec();
        run_blocking(move || write_rows(&target, &results)).await?;

        tracing::debug!("Appended {} result(s) to {}", count, path.display());
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}
