//! Ripple-Crawl: a deadline-bound concurrent web crawler
//!
//! This crate crawls a link graph from a seed address, fanning out one task per
//! discovered link up to a runtime-adjustable depth bound, and streams every
//! fetched (title, url) pair to a single consumer that decides when to stop.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by a page source for a single address
///
/// A fetch error becomes a failed outcome on the result stream. It never marks
/// the address visited and never affects sibling tasks.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid address {url}: {source}")]
    InvalidAddress {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    UnsupportedContent { url: String, content_type: String },

    #[error("Page {url} unavailable: {reason}")]
    Unavailable { url: String, reason: String },
}

impl FetchError {
    /// Returns the address the failed fetch was attempted for
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidAddress { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Status { url, .. }
            | FetchError::UnsupportedContent { url, .. }
            | FetchError::Unavailable { url, .. } => url,
        }
    }
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlControls, CrawlSession, Crawler, Page, PageSource};
pub use output::{CrawlOutcome, CrawlReport, StopReason};
pub use state::{DedupPolicy, DepthBound, VisitedRegistry};
