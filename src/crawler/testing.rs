//! In-memory collaborators for crawler tests

use crate::content::{LinkExtractor, ScraperParser};
use crate::crawler::processor::PageProcessor;
use crate::crawler::queue::{work_queue, TaskReceiver};
use crate::crawler::visited::VisitedSet;
use crate::fetch::{ContentRepository, Downloader, MemoryCache, WebContent};
use crate::output::{CrawlResult, OutputError, OutputFormat, OutputResult, ResultSink};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Serves fixed pages keyed by URL and records every request
#[derive(Default)]
pub(crate) struct StaticSite {
    pages: HashMap<String, WebContent>,
    requests: Mutex<Vec<String>>,
}

impl StaticSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an HTML page whose body links to each of `links`
    pub(crate) fn page(mut self, url: &str, links: &[&str]) -> Self {
        let anchors: String = links
            .iter()
            .map(|l| format!("<a href=\"{}\">link</a>", l))
            .collect();
        self.pages.insert(
            url.to_string(),
            WebContent {
                body: format!("<html><body>{}</body></html>", anchors),
                content_type: "text/html; charset=utf-8".to_string(),
            },
        );
        self
    }

    pub(crate) fn raw(mut self, url: &str, body: &str, content_type: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            WebContent {
                body: body.to_string(),
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requested(&self, url: &str) -> bool {
        self.requests().iter().any(|r| r == url)
    }
}

#[async_trait]
impl Downloader for StaticSite {
    async fn download(&self, uri: &Url) -> Option<WebContent> {
        self.requests.lock().unwrap().push(uri.to_string());
        self.pages.get(uri.as_str()).cloned()
    }
}

/// Downloader that panics on every call
pub(crate) struct PanickingDownloader;

#[async_trait]
impl Downloader for PanickingDownloader {
    async fn download(&self, uri: &Url) -> Option<WebContent> {
        panic!("downloader exploded on {}", uri);
    }
}

/// Sink that keeps results in memory, or fails every append
#[derive(Default)]
pub(crate) struct RecordingSink {
    results: Mutex<Vec<CrawlResult>>,
    fail: bool,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn results(&self) -> Vec<CrawlResult> {
        self.results.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn append(&self, _path: &Path, results: &[CrawlResult]) -> OutputResult<()> {
        if self.fail {
            return Err(OutputError::Write("disk full".to_string()));
        }
        self.results.lock().unwrap().extend_from_slice(results);
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// A processor wired to in-memory collaborators, plus the queue consumer
pub(crate) fn processor(
    downloader: Arc<dyn Downloader>,
    sink: Arc<dyn ResultSink>,
    politeness_delay: Duration,
    cancel: CancellationToken,
) -> (Arc<PageProcessor>, TaskReceiver) {
    let repository = ContentRepository::new(
        downloader,
        Arc::new(MemoryCache::new()),
        Duration::from_secs(60),
    );
    let extractor = LinkExtractor::new(Arc::new(ScraperParser));
    let (queue, receiver) = work_queue();

    let processor = PageProcessor::new(
        repository,
        extractor,
        sink,
        Arc::new(VisitedSet::new()),
        queue,
        politeness_delay,
        cancel,
    );

    (Arc::new(processor), receiver)
}
