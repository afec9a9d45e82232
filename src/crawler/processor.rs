//! Page processor: the per-task unit of work
//!
//! Processing a task means:
//! - Waiting out the politeness delay (skipped for seeds)
//! - Fetching the page through the read-through repository
//! - Dispatching on content type and extracting admissible links
//! - Admitting unseen links as child tasks one level deeper
//! - Appending the page's result to the job's results file
//!
//! Every failure is contained here: the task ends `Failed` and the error is
//! logged with the page URI.

use crate::content::{dispatch, ContentError, LinkExtractor};
use crate::crawler::queue::WorkQueue;
use crate::crawler::task::CrawlTask;
use crate::crawler::visited::VisitedSet;
use crate::fetch::ContentRepository;
use crate::output::{CrawlResult, ResultSink};
use crate::state::TaskStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a task ended `Failed`
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("no content could be downloaded")]
    DownloadFailed,

    #[error(transparent)]
    UnsupportedContentType(#[from] ContentError),

    #[error("processing was cancelled")]
    Cancelled,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Executes crawl tasks against shared job collaborators
pub struct PageProcessor {
    repository: ContentRepository,
    extractor: LinkExtractor,
    sink: Arc<dyn ResultSink>,
    visited: Arc<VisitedSet>,
    queue: WorkQueue,
    politeness_delay: Duration,
    cancel: CancellationToken,
}

impl PageProcessor {
    pub fn new(
        repository: ContentRepository,
        extractor: LinkExtractor,
        sink: Arc<dyn ResultSink>,
        visited: Arc<VisitedSet>,
        queue: WorkQueue,
        politeness_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            repository,
            extractor,
            sink,
            visited,
            queue,
            politeness_delay,
            cancel,
        }
    }

    /// Admits a task to the visited set and, if it is new, to the queue
    ///
    /// Returns `true` only for the first admission of a URI.
    pub fn admit(&self, task: CrawlTask) -> bool {
        if !self.visited.admit(&task.uri) {
            return false;
        }
        self.queue.push(task)
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Runs one task to a terminal status
    pub async fn process(&self, task: &mut CrawlTask) {
        if let Err(e) = task.transition(TaskStatus::Processing) {
            tracing::error!("Cannot process {}: {}", task.uri, e);
            return;
        }

        let next = match self.run(task).await {
            Ok(()) => TaskStatus::Completed,
            Err(e) => {
                match &e {
                    ProcessError::Cancelled => tracing::debug!("Cancelled {}", task.uri),
                    ProcessError::UnsupportedContentType(_) => {
                        tracing::warn!("Skipping {}: {}", task.uri, e)
                    }
                    ProcessError::DownloadFailed | ProcessError::Unexpected(_) => {
                        tracing::error!("Failed to process {}: {}", task.uri, e)
                    }
                }
                TaskStatus::Failed
            }
        };

        if let Err(e) = task.transition(next) {
            tracing::error!("Cannot finish {}: {}", task.uri, e);
        }
    }

    async fn run(&self, task: &CrawlTask) -> Result<(), ProcessError> {
        let started = Instant::now();

        if task.depth > 0 && !self.politeness_delay.is_zero() {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ProcessError::Cancelled),
                _ = tokio::time::sleep(self.politeness_delay) => {}
            }
        }

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ProcessError::Cancelled),
            content = self.repository.get_content(&task.uri) => content,
        };
        let content = fetched.ok_or(ProcessError::DownloadFailed)?;

        let handler = dispatch(&content.content_type)?;
        let outcome = handler.handle(&content, &task.uri, &self.extractor);

        if self.cancel.is_cancelled() {
            return Err(ProcessError::Cancelled);
        }

        let admitted = outcome
            .links
            .iter()
            .filter(|link| self.admit(task.child((*link).clone())))
            .count();
        tracing::debug!(
            "{} link(s) on {} (depth {}), {} new",
            outcome.links.len(),
            task.uri,
            task.depth,
            admitted
        );

        let result = CrawlResult::new(
            task.uri.clone(),
            task.parent_uri.clone(),
            outcome.links,
            started.elapsed(),
            task.depth,
        );
        self.sink
            .append(task.output_path(), std::slice::from_ref(&result))
            .await
            .map_err(|e| ProcessError::Unexpected(e.to_string()))?;

        tracing::info!("Crawled {} (depth {})", task.uri, task.depth);
        Ok(())
    }
}

impl std::fmt::Debug for PageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageProcessor")
            .field("politeness_delay", &self.politeness_delay)
            .field("visited", &self.visited.len())
            .finish_non_exhaustive()
    }
}
