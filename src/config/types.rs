use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlOptions,
    #[serde(default)]
    pub infrastructure: InfrastructureOptions,
}

/// Crawl job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// Comma-separated list of seed URIs
    #[serde(rename = "initial-uris")]
    pub initial_uris: String,

    /// Maximum depth to crawl from seed URIs (seeds are depth 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Results file format (`csv` or `json`)
    #[serde(rename = "output-format")]
    pub output_format: String,

    /// Directory that receives the results file
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Maximum number of pages processed concurrently
    #[serde(rename = "max-concurrent-tasks")]
    pub max_concurrent_tasks: u32,

    /// Pause before fetching any non-seed page (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// How long a take from the work queue waits before re-checking for completion (milliseconds)
    #[serde(rename = "idle-poll-ms")]
    pub idle_poll_ms: u64,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            initial_uris: String::new(),
            max_depth: 2,
            output_format: "json".to_string(),
            output_path: "./output".to_string(),
            max_concurrent_tasks: 8,
            politeness_delay_ms: 1000,
            idle_poll_ms: 500,
        }
    }
}

impl CrawlOptions {
    /// Splits `initial_uris` into trimmed, non-empty seed strings
    pub fn seeds(&self) -> Vec<String> {
        self.initial_uris
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

/// Network and cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InfrastructureOptions {
    /// Total number of download attempts per URI
    #[serde(rename = "retry-count")]
    pub retry_count: u32,

    /// Exponential backoff base; the wait after attempt `n` is `base^n` units
    #[serde(rename = "backoff-base")]
    pub backoff_base: f64,

    /// Length of one backoff unit (milliseconds)
    #[serde(rename = "backoff-unit-ms")]
    pub backoff_unit_ms: u64,

    /// Time-to-live for cached page content (seconds)
    #[serde(rename = "cache-expiry-seconds")]
    pub cache_expiry_seconds: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for InfrastructureOptions {
    fn default() -> Self {
        Self {
            retry_count: 3,
            backoff_base: 2.0,
            backoff_unit_ms: 1000,
            cache_expiry_seconds: 300,
            request_timeout_seconds: 30,
            user_agent: "CrawlerBot/1.0".to_string(),
        }
    }
}

impl InfrastructureOptions {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub initial_uris: Option<String>,
    pub max_depth: Option<u32>,
    pub output_format: Option<String>,
    pub output_path: Option<String>,
}

impl Config {
    /// Applies command-line overrides; a present, non-empty value wins
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(uris) = overrides.initial_uris.filter(|s| !s.is_empty()) {
            self.crawl.initial_uris = uris;
        }
        if let Some(depth) = overrides.max_depth {
            self.crawl.max_depth = depth;
        }
        if let Some(format) = overrides.output_format.filter(|s| !s.is_empty()) {
            self.crawl.output_format = format;
        }
        if let Some(path) = overrides.output_path.filter(|s| !s.is_empty()) {
            self.crawl.output_path = path;
        }
        self
    }
}
