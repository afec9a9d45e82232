use std::fmt;

/// Lifecycle of a crawl job
///
/// `Seeding -> Running -> Draining -> Done`. A job with no valid seeds goes
/// directly from `Seeding` to `Done`, and cancellation moves `Running`
/// straight to `Draining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Seed URIs are being parsed and admitted
    Seeding,
    /// Tasks are being taken from the queue and dispatched
    Running,
    /// No new work; waiting for in-flight tasks to finish
    Draining,
    /// All workers joined
    Done,
}

impl JobState {
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Running)
                | (Self::Seeding, Self::Done)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}
