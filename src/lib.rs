//! Webcrawler: a same-host, depth-bounded breadth-first web crawler
//!
//! This crate crawls a website from one or more seed URIs, follows same-host
//! links up to a maximum depth, and records every visited page (its outgoing
//! links, depth and timing) to a CSV or JSON results file.

pub mod config;
pub mod content;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod state;
pub mod uri;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("No valid seed URIs were supplied")]
    NoValidSeeds,

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TaskStatus,
        to: state::TaskStatus,
    },

    #[error("Invalid job state transition: {from:?} -> {to:?}")]
    InvalidJobTransition {
        from: state::JobState,
        to: state::JobState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlJob, CrawlSummary, CrawlTask};
pub use output::CrawlResult;
pub use state::{JobState, TaskStatus};
