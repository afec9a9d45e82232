use crate::config::InfrastructureOptions;
use std::time::Duration;

/// Upper bound for a single backoff wait
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Bounded exponential backoff for one download
///
/// `max_attempts` counts every request, including the first. The wait after
/// failed attempt `n` (1-based) is `unit * base^n`, so the defaults of
/// `base = 2` and `unit = 1s` wait 2s, then 4s, and so on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: f64,
    pub unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base: f64, unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base,
            unit,
        }
    }

    pub fn from_options(options: &InfrastructureOptions) -> Self {
        Self::new(
            options.retry_count,
            options.backoff_base,
            Duration::from_millis(options.backoff_unit_ms),
        )
    }

    /// Returns true if another attempt may follow attempt number `attempt`
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the attempt that follows attempt number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.unit.as_secs_f64() * self.base.powi(exponent);
        Duration::try_from_secs_f64(seconds)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_options(&InfrastructureOptions::default())
    }
}
