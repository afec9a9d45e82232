use crate::config::types::{Config, CrawlOptions, InfrastructureOptions};
use crate::ConfigError;

/// Validates the entire configuration
///
/// Seed URIs are deliberately not checked here: an invalid seed is skipped
/// at crawl time, and a job without any valid seed fails when it starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_options(&config.crawl)?;
    validate_infrastructure_options(&config.infrastructure)?;
    Ok(())
}

fn validate_crawl_options(options: &CrawlOptions) -> Result<(), ConfigError> {
    if options.max_concurrent_tasks < 1 || options.max_concurrent_tasks > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_tasks must be between 1 and 100, got {}",
            options.max_concurrent_tasks
        )));
    }

    if options.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    if options.idle_poll_ms == 0 {
        return Err(ConfigError::Validation(
            "idle_poll_ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_infrastructure_options(options: &InfrastructureOptions) -> Result<(), ConfigError> {
    if options.retry_count < 1 {
        return Err(ConfigError::Validation(format!(
            "retry_count must be >= 1, got {}",
            options.retry_count
        )));
    }

    if !options.backoff_base.is_finite() || options.backoff_base < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_base must be a finite number >= 1.0, got {}",
            options.backoff_base
        )));
    }

    if options.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
