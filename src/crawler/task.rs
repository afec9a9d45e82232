//! Crawl task definition

use crate::state::TaskStatus;
use crate::{CrawlError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// A unit of scheduled work: one URI to fetch at a known depth
///
/// Tasks are owned by exactly one component at a time (the queue, the
/// scheduler, or a single worker), so status changes need no locking.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// Absolute HTTP(S) URI to fetch
    pub uri: Url,

    /// Page that discovered this one (`None` for seeds)
    pub parent_uri: Option<Url>,

    /// Distance from the seed
    pub depth: u32,

    output_path: Arc<PathBuf>,
    status: TaskStatus,
}

impl CrawlTask {
    /// Creates a depth-0 task for a seed URI
    pub fn seed(uri: Url, output_path: Arc<PathBuf>) -> Self {
        Self {
            uri,
            parent_uri: None,
            depth: 0,
            output_path,
            status: TaskStatus::Pending,
        }
    }

    /// Creates a task for a link discovered on this task's page
    pub fn child(&self, uri: Url) -> Self {
        Self {
            uri,
            parent_uri: Some(self.uri.clone()),
            depth: self.depth + 1,
            output_path: Arc::clone(&self.output_path),
            status: TaskStatus::Pending,
        }
    }

    /// Results file shared by every task of the job
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Moves the task to `next`, rejecting transitions that go backwards
    pub fn transition(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        Ok(())
    }
}
