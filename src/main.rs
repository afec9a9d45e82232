//! Webcrawler main entry point
//!
//! This is the command-line interface for the same-host breadth-first crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;
use webcrawler::config::{load_config_with_hash, validate, Config, ConfigOverrides};
use webcrawler::crawler::CrawlJob;
use webcrawler::output::OutputFormat;

/// Webcrawler: a polite same-host web crawler
///
/// Crawls a site breadth-first from one or more seed URIs, following links
/// on the same host up to a maximum depth, and records every visited page
/// with its outgoing links to a CSV or JSON file.
#[derive(Parser, Debug)]
#[command(name = "webcrawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite same-host web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated seed URIs
    #[arg(short = 'u', long = "url", value_name = "URIS")]
    initial_uris: Option<String>,

    /// Maximum link depth from the seeds
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Results format (csv or json)
    #[arg(short = 'f', long = "format")]
    output_format: Option<String>,

    /// Directory for the results file
    #[arg(short = 'o', long = "output")]
    output_path: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            initial_uris: self.initial_uris.clone(),
            max_depth: self.max_depth,
            output_format: self.output_format.clone(),
            output_path: self.output_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let config = config.merge(cli.overrides());
    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webcrawler=info,warn"),
            1 => EnvFilter::new("webcrawler=debug,info"),
            2 => EnvFilter::new("webcrawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the merged configuration and the seeds
fn handle_dry_run(config: &Config) {
    println!("=== Webcrawler Dry Run ===\n");

    println!("Crawl:");
    println!("  Max depth: {}", config.crawl.max_depth);
    println!("  Max concurrent tasks: {}", config.crawl.max_concurrent_tasks);
    println!("  Politeness delay: {}ms", config.crawl.politeness_delay_ms);
    println!(
        "  Output: {} ({})",
        config.crawl.output_path,
        OutputFormat::from_config(&config.crawl.output_format).extension()
    );

    println!("\nInfrastructure:");
    println!("  Download attempts: {}", config.infrastructure.retry_count);
    println!("  Cache expiry: {}s", config.infrastructure.cache_expiry_seconds);
    println!("  User agent: {}", config.infrastructure.user_agent);

    let seeds = config.crawl.seeds();
    let mut valid = 0;
    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds {
        match Url::parse(seed) {
            Ok(uri) if uri.scheme() == "http" || uri.scheme() == "https" => {
                valid += 1;
                println!("  * {}", uri);
            }
            Ok(_) => println!("  - {} (not HTTP)", seed),
            Err(e) => println!("  - {} ({})", seed, e),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} of {} seed URI(s)", valid, seeds.len());
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight pages");
            on_signal.cancel();
        }
    });

    let job = CrawlJob::new(config).context("failed to set up crawl")?;
    let output = job.output_file().to_path_buf();

    let summary = job.run(cancel).await.context("crawl failed")?;

    tracing::info!(
        "Crawl completed in {:?}: {} page(s) recorded in {}",
        summary.elapsed,
        summary.completed,
        output.display()
    );
    tracing::info!(
        "{} task(s) finished, {} failed, {} beyond max depth",
        summary.total(),
        summary.failed,
        summary.depth_limited
    );
    Ok(())
}
