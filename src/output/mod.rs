//! Output module for recording crawl results
//!
//! This module handles:
//! - The per-page result record
//! - Choosing a results sink from the configured format
//! - Appending results to CSV or JSON files safely under concurrency
//! - Naming the per-job results file

mod csv_sink;
mod json_sink;
mod traits;

pub use csv_sink::CsvSink;
pub use json_sink::{read_results, JsonSink};
pub use traits::{OutputError, OutputResult, ResultSink};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Durable record of one processed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// The page that was crawled
    pub uri: Url,

    /// The page that discovered it (`None` for seeds)
    pub parent_uri: Option<Url>,

    /// Admissible child links found on the page
    pub links: Vec<Url>,

    /// Wall-clock time spent on the page, in milliseconds
    pub crawl_time_ms: u64,

    /// Distance from the seed (seeds are 0)
    pub depth: u32,
}

impl CrawlResult {
    pub fn new(
        uri: Url,
        parent_uri: Option<Url>,
        links: Vec<Url>,
        elapsed: Duration,
        depth: u32,
    ) -> Self {
        Self {
            uri,
            parent_uri,
            links,
            crawl_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            depth,
        }
    }
}

/// Supported results file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Parses a configured format name; unknown names fall back to JSON
    pub fn from_config(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "json" => Self::Json,
            other => {
                tracing::warn!("Unknown output format '{}', falling back to json", other);
                Self::Json
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Creates the sink for the given format
pub fn build_sink(format: OutputFormat) -> Arc<dyn ResultSink> {
    match format {
        OutputFormat::Csv => Arc::new(CsvSink::new()),
        OutputFormat::Json => Arc::new(JsonSink::new()),
    }
}

/// Builds the results file path for a new job
///
/// The file is `<dir>/crawl_<yyyyMMddHHmmss>_<uuid>.<ext>`, so separate jobs
/// never share a file.
pub fn output_file_path(dir: &Path, format: OutputFormat, started_at: DateTime<Local>) -> PathBuf {
    let file_name = format!(
        "crawl_{}_{}.{}",
        started_at.format("%Y%m%d%H%M%S"),
        Uuid::new_v4(),
        format.extension()
    );
    dir.join(file_name)
}
