//! State management module
//!
//! This module defines the state machines used during a crawl:
//! - Task status (one-way lifecycle of a single crawl task)
//! - Job state (lifecycle of the crawl job as a whole)

mod job_state;
mod task_state;

pub use job_state::JobState;
pub use task_state::TaskStatus;
