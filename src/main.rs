//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl web crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config};
use ripple_crawl::crawler::{CrawlControls, CrawlSession, HttpPageSource};
use ripple_crawl::output::{generate_markdown_summary, print_statistics};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a deadline-bound concurrent web crawler
///
/// Crawls outward from a seed URL, printing every page title it finds, until
/// the result budget, the error budget, or the deadline runs out.
///
/// Send SIGINT to stop early and SIGUSR1 to raise the depth bound.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A deadline-bound concurrent web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL, overriding the configuration
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Write a markdown summary of the crawl to this path
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(url) = cli.url {
        config.crawler.seed_url = url;
        validate(&config).context("Invalid seed URL")?;
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.summary).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config) {
    println!("=== Ripple-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Depth increment: {}", config.crawler.depth_increment);
    println!("  Dedup policy: {:?}", config.crawler.dedup);
    println!("  Result buffer: {}", config.crawler.result_buffer);

    println!("\nLimits:");
    println!("  Max results: {}", config.limits.max_results);
    println!("  Max errors: {}", config.limits.max_errors);
    println!("  Max duration: {}s", config.limits.max_duration);

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, summary: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Crawler initialization");
    let source =
        HttpPageSource::from_config(&config.fetcher).context("Failed to build HTTP client")?;
    let session = CrawlSession::new(Arc::new(source), &config);
    tracing::info!("Crawler initialized");

    let signals = tokio::spawn(listen_for_signals(session.controls()));

    let report = session.run(&config.crawler.seed_url).await;
    signals.abort();

    print_statistics(&report);

    if let Some(path) = summary {
        generate_markdown_summary(&report, &path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("\n✓ Summary written to: {}", path.display());
    }

    Ok(())
}

/// Maps SIGINT to shutdown and SIGUSR1 to a depth increase
#[cfg(unix)]
async fn listen_for_signals(controls: CrawlControls) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut interrupt, mut user1) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::user_defined1()),
    ) {
        (Ok(interrupt), Ok(user1)) => (interrupt, user1),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Failed to install signal handlers: {}", e);
            return;
        }
    };

    loop {
        tokio::select! {
            _ = interrupt.recv() => {
                tracing::info!("Got SIGINT");
                controls.shutdown();
            }
            _ = user1.recv() => {
                tracing::info!("Got SIGUSR1");
                controls.increase_depth();
            }
        }
    }
}

/// Maps Ctrl-C to shutdown
#[cfg(not(unix))]
async fn listen_for_signals(controls: CrawlControls) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        tracing::info!("Got Ctrl-C");
        controls.shutdown();
    }
}
