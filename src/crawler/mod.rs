//! Crawler module: the concurrent crawl engine
//!
//! This module contains:
//! - The crawl task and its one-way status lifecycle
//! - The job-wide visited set and the self-feeding work queue
//! - The page processor (fetch, extract, enqueue children, record result)
//! - The scheduler state machine that seeds, dispatches and drains a job
//! - Job wiring from a [`Config`](crate::config::Config)

mod job;
mod processor;
mod queue;
mod scheduler;
mod task;
mod visited;

#[cfg(test)]
mod testing;

pub use job::{run_crawl, CrawlJob};
pub use processor::{PageProcessor, ProcessError};
pub use queue::{work_queue, OutstandingGuard, Take, TaskReceiver, WorkQueue};
pub use scheduler::{CrawlSummary, Scheduler, SchedulerSettings};
pub use task::CrawlTask;
pub use visited::VisitedSet;
