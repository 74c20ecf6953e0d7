//! Crawler module: the concurrent crawl core and its page source
//!
//! This module contains:
//! - The `PageSource` seam and its HTTP implementation
//! - HTML parsing and link extraction
//! - The recursive crawl orchestrator
//! - Crawl sessions with deadline, budgets, and operator controls

mod fetcher;
mod orchestrator;
mod parser;
mod session;
mod source;

pub use fetcher::{build_http_client, HttpPageSource};
pub use orchestrator::Crawler;
pub use parser::{parse_html, ParsedPage};
pub use session::{CrawlControls, CrawlSession};
pub use source::{Page, PageSource};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;
use std::sync::Arc;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Create a session from the configuration
/// 3. Crawl from the configured seed until a stopping condition fires
///
/// Use `CrawlSession` directly to keep the operator controls.
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&Config::default()).await?;
/// println!("{} pages", report.success_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlReport, CrawlError> {
    let source = HttpPageSource::from_config(&config.fetcher)?;
    let session = CrawlSession::new(Arc::new(source), config);
    Ok(session.run(&config.crawler.seed_url).await)
}
