//! Crawl job wiring
//!
//! A [`CrawlJob`] owns every per-job collaborator (visited set, queue, cache,
//! sink) so several jobs can run in one process without sharing state.

use crate::config::Config;
use crate::content::{HtmlParser, LinkExtractor, ScraperParser};
use crate::crawler::processor::PageProcessor;
use crate::crawler::queue::work_queue;
use crate::crawler::scheduler::{CrawlSummary, Scheduler, SchedulerSettings};
use crate::crawler::visited::VisitedSet;
use crate::fetch::{ContentCache, ContentRepository, Downloader, HttpDownloader, MemoryCache};
use crate::output::{build_sink, output_file_path, OutputFormat, ResultSink};
use crate::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One crawl job, ready to run
pub struct CrawlJob {
    config: Config,
    downloader: Arc<dyn Downloader>,
    cache: Arc<dyn ContentCache>,
    parser: Arc<dyn HtmlParser>,
    sink: Arc<dyn ResultSink>,
    output_file: PathBuf,
}

impl CrawlJob {
    /// Builds a job that downloads over HTTP
    pub fn new(config: Config) -> Result<Self> {
        let downloader = HttpDownloader::from_options(&config.infrastructure)?;
        Ok(Self::with_downloader(config, Arc::new(downloader)))
    }

    /// Builds a job around a custom downloader
    pub fn with_downloader(config: Config, downloader: Arc<dyn Downloader>) -> Self {
        let format = OutputFormat::from_config(&config.crawl.output_format);
        let output_file =
            output_file_path(Path::new(&config.crawl.output_path), format, Local::now());

        Self {
            downloader,
            cache: Arc::new(MemoryCache::new()),
            parser: Arc::new(ScraperParser),
            sink: build_sink(format),
            output_file,
            config,
        }
    }

    /// The results file every task of this job appends to
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Runs the job until every admitted task is terminal or `cancel` fires
    pub async fn run(self, cancel: CancellationToken) -> Result<CrawlSummary> {
        let seeds = self.config.crawl.seeds();
        tracing::info!(
            "Starting crawl: {} seed(s), max depth {}, results in {}",
            seeds.len(),
            self.config.crawl.max_depth,
            self.output_file.display()
        );

        let repository = ContentRepository::new(
            self.downloader,
            self.cache,
            self.config.infrastructure.cache_ttl(),
        );
        let (queue, receiver) = work_queue();
        let processor = PageProcessor::new(
            repository,
            LinkExtractor::new(self.parser),
            self.sink,
            Arc::new(VisitedSet::new()),
            queue,
            self.config.crawl.politeness_delay(),
            cancel,
        );

        let scheduler = Scheduler::new(
            SchedulerSettings::from_options(&self.config.crawl),
            Arc::new(processor),
            receiver,
        );
        scheduler.run(&seeds, self.output_file).await
    }
}

impl std::fmt::Debug for CrawlJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlJob")
            .field("config", &self.config)
            .field("output_file", &self.output_file)
            .finish_non_exhaustive()
    }
}

/// Runs a complete crawl for `config`
///
/// # Arguments
///
/// * `config` - The merged run configuration
/// * `cancel` - Stops the job early when cancelled
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The job reached `Done`
/// * `Err(CrawlError)` - The HTTP client could not be built or no seed was valid
pub async fn run_crawl(config: Config, cancel: CancellationToken) -> Result<CrawlSummary> {
    CrawlJob::new(config)?.run(cancel).await
}
