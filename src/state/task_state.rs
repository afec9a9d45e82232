/// Task status definitions for tracking crawl progress
///
/// A task moves `Pending -> Processing -> {Completed | Failed}`, or straight
/// from `Pending` to `DepthLimitExceeded` when the scheduler refuses it.
/// Transitions are one-way.
use std::fmt;

/// Represents the current status of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    // ===== Active States =====
    /// Task is queued and waiting to be taken by the scheduler
    Pending,

    /// Task is being downloaded and processed
    Processing,

    // ===== Terminal States =====
    /// Page was fetched, its links enqueued and its result recorded
    Completed,

    /// Download, dispatch or result recording failed for this task
    Failed,

    /// Task depth is beyond the configured maximum; never fetched
    DepthLimitExceeded,
}

impl TaskStatus {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::DepthLimitExceeded
        )
    }

    /// Checks whether moving from this status to `next` is legal
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::DepthLimitExceeded)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Short lowercase name, used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::DepthLimitExceeded => "depth_limit_exceeded",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
