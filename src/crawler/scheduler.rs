//! Crawl task scheduler
//!
//! The scheduler drives one job through `Seeding -> Running -> Draining ->
//! Done`:
//! - Seeding admits every valid seed URI as a depth-0 task
//! - Running takes tasks from the queue, refuses those beyond the maximum
//!   depth, and spawns the rest onto a worker set bounded by a semaphore
//! - Draining starts once a bounded-wait take comes back empty while no work
//!   is outstanding (or on cancellation), and joins every worker
//!
//! Traversal is breadth-first because children are only enqueued by their
//! parent's worker, one level deeper than the parent.

use crate::config::CrawlOptions;
use crate::crawler::processor::PageProcessor;
use crate::crawler::queue::{OutstandingGuard, Take, TaskReceiver};
use crate::crawler::task::CrawlTask;
use crate::state::{JobState, TaskStatus};
use crate::{CrawlError, Result};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Scheduling limits for one job
#[derive(Debug, Clone, Copy)]
pub struct SchedulerSettings {
    /// Deepest level that is fetched (seeds are level 0)
    pub max_depth: u32,

    /// Maximum number of tasks processed at once
    pub max_concurrent_tasks: usize,

    /// How long one take waits before checking for completion
    pub idle_poll: Duration,
}

impl SchedulerSettings {
    pub fn from_options(options: &CrawlOptions) -> Self {
        Self {
            max_depth: options.max_depth,
            max_concurrent_tasks: options.max_concurrent_tasks.max(1) as usize,
            idle_poll: options.idle_poll(),
        }
    }
}

/// Final tallies for a job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URIs admitted to the visited set (seeds included)
    pub admitted: usize,
    pub completed: usize,
    pub failed: usize,
    pub depth_limited: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Tasks that reached a terminal status
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.depth_limited
    }

    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::DepthLimitExceeded => self.depth_limited += 1,
            _ => self.failed += 1,
        }
    }
}

/// Drives a crawl job from its seeds to completion
pub struct Scheduler {
    settings: SchedulerSettings,
    processor: Arc<PageProcessor>,
    receiver: TaskReceiver,
    semaphore: Arc<Semaphore>,
    workers: JoinSet<CrawlTask>,
    state: JobState,
    summary: CrawlSummary,
}

impl Scheduler {
    pub fn new(
        settings: SchedulerSettings,
        processor: Arc<PageProcessor>,
        receiver: TaskReceiver,
    ) -> Self {
        Self {
            settings,
            semaphore: Arc::new(Semaphore::new(settings.max_concurrent_tasks)),
            processor,
            receiver,
            workers: JoinSet::new(),
            state: JobState::Seeding,
            summary: CrawlSummary::default(),
        }
    }

    /// Runs the job to `Done`
    ///
    /// # Arguments
    ///
    /// * `seeds` - Raw seed URI strings; invalid ones are logged and skipped
    /// * `output_path` - Results file shared by every task of the job
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The job finished (normally or by cancellation)
    /// * `Err(CrawlError::NoValidSeeds)` - Nothing could be seeded
    pub async fn run(mut self, seeds: &[String], output_path: PathBuf) -> Result<CrawlSummary> {
        let started = Instant::now();
        let output_path = Arc::new(output_path);

        let seeded = self.seed(seeds, &output_path);
        if seeded == 0 {
            tracing::error!("No valid seed URIs, nothing to crawl");
            self.transition(JobState::Done)?;
            return Err(CrawlError::NoValidSeeds);
        }
        tracing::info!("Seeded {} URI(s)", seeded);

        self.transition(JobState::Running)?;
        self.take_loop().await;

        self.transition(JobState::Draining)?;
        self.drain().await;

        self.transition(JobState::Done)?;
        self.summary.admitted = self.processor.visited().len();
        self.summary.elapsed = started.elapsed();

        tracing::info!(
            "Crawl finished: {} completed, {} failed, {} beyond max depth in {:.1}s",
            self.summary.completed,
            self.summary.failed,
            self.summary.depth_limited,
            self.summary.elapsed.as_secs_f64()
        );

        Ok(self.summary)
    }

    fn seed(&self, seeds: &[String], output_path: &Arc<PathBuf>) -> usize {
        let mut seeded = 0;

        for raw in seeds {
            let uri = match Url::parse(raw) {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!("Skipping invalid seed URI '{}': {}", raw, e);
                    continue;
                }
            };

            if uri.scheme() != "http" && uri.scheme() != "https" {
                tracing::warn!("Skipping seed URI '{}': not HTTP(S)", raw);
                continue;
            }

            if self
                .processor
                .admit(CrawlTask::seed(uri, Arc::clone(output_path)))
            {
                seeded += 1;
            } else {
                tracing::debug!("Skipping duplicate seed URI '{}'", raw);
            }
        }

        seeded
    }

    async fn take_loop(&mut self) {
        let cancel = self.processor.cancel_token().clone();

        loop {
            self.reap_finished();

            let take = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                take = self.receiver.take(self.settings.idle_poll) => Some(take),
            };

            match take {
                None => {
                    tracing::info!("Cancellation requested, no new tasks will be started");
                    return;
                }
                Some(Take::Task(task, guard)) => {
                    if !self.dispatch(task, guard).await {
                        tracing::info!("Cancellation requested, no new tasks will be started");
                        return;
                    }
                }
                Some(Take::Idle) => {
                    let outstanding = self.receiver.outstanding();
                    if outstanding == 0 {
                        tracing::debug!("Queue idle with no outstanding work");
                        return;
                    }
                    tracing::debug!("Queue idle, waiting on {} outstanding task(s)", outstanding);
                }
                Some(Take::Closed) => return,
            }
        }
    }

    /// Refuses or spawns one task; returns `false` if cancelled while waiting
    /// for a worker slot
    async fn dispatch(&mut self, mut task: CrawlTask, guard: OutstandingGuard) -> bool {
        if task.depth > self.settings.max_depth {
            tracing::debug!(
                "Not fetching {}: depth {} exceeds {}",
                task.uri,
                task.depth,
                self.settings.max_depth
            );
            match task.transition(TaskStatus::DepthLimitExceeded) {
                Ok(()) => self.summary.record(task.status()),
                Err(e) => tracing::error!("Cannot refuse {}: {}", task.uri, e),
            }
            return true;
        }

        let Some(permit) = self.acquire_slot().await else {
            return false;
        };

        let processor = Arc::clone(&self.processor);
        self.workers.spawn(async move {
            let _permit = permit;
            let _guard = guard;
            processor.process(&mut task).await;
            task
        });

        true
    }

    /// Waits for a free worker slot unless the job is cancelled first
    fn acquire_slot(&self) -> impl Future<Output = Option<OwnedSemaphorePermit>> {
        let semaphore = Arc::clone(&self.semaphore);
        let cancel = self.processor.cancel_token().clone();

        async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = semaphore.acquire_owned() => permit.ok(),
            }
        }
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.workers.try_join_next() {
            self.tally(joined);
        }
    }

    async fn drain(&mut self) {
        if !self.workers.is_empty() {
            tracing::info!("Waiting for {} in-flight task(s)", self.workers.len());
        }
        while let Some(joined) = self.workers.join_next().await {
            self.tally(joined);
        }
    }

    fn tally(&mut self, joined: std::result::Result<CrawlTask, JoinError>) {
        match joined {
            Ok(task) => self.summary.record(task.status()),
            Err(e) => {
                if e.is_panic() {
                    tracing::error!("Worker panicked while processing a task: {}", e);
                } else {
                    tracing::error!("Worker did not finish: {}", e);
                }
                self.summary.failed += 1;
            }
        }
    }

    fn transition(&mut self, next: JobState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidJobTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Job state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}
