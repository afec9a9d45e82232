//! Configuration module for the crawler
//!
//! This module handles loading, parsing, merging and validating the run
//! configuration. Every key has a default, so a configuration file is optional
//! and command-line overrides can supply the rest.
//!
//! # Example
//!
//! ```no_run
//! use webcrawler::config::load_config_with_hash;
//! use std::path::Path;
//!
//! let (config, _hash) = load_config_with_hash(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigOverrides, CrawlOptions, InfrastructureOptions};

// Re-export parser functions
pub use parser::{load_config_with_hash, parse_config};
pub use validation::validate;
