//! HTTP page source
//!
//! This module fetches pages over HTTP for the crawler:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests raced against crawl cancellation
//! - Error classification into `FetchError`
//! - Handing the body to the HTML parser

use crate::config::FetcherConfig;
use crate::crawler::parser::parse_html;
use crate::crawler::source::{Page, PageSource};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::FetcherConfig;
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page source backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches and parses one page
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Address does not parse as a URL | InvalidAddress |
    /// | Request timed out | Timeout |
    /// | Connection or transport failure | Request |
    /// | Non-2xx status | Status |
    /// | Content-Type present and not HTML | UnsupportedContent |
    async fn get_page(&self, address: &str) -> Result<Page, FetchError> {
        let url = Url::parse(address).map_err(|source| FetchError::InvalidAddress {
            url: address.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: address.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::UnsupportedContent {
                    url: address.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        // Relative links resolve against where the redirects ended up.
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(address, e))?;

        let parsed = parse_html(&body, &final_url);
        tracing::trace!("Parsed {} links from {}", parsed.links.len(), address);

        Ok(Page {
            title: parsed.title.unwrap_or_default(),
            links: parsed.links,
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(
        &self,
        token: &CancellationToken,
        address: &str,
    ) -> Result<Option<Page>, FetchError> {
        if token.is_cancelled() {
            return Ok(None);
        }

        tokio::select! {
            _ = token.cancelled() => Ok(None),
            page = self.get_page(address) => page.map(Some),
        }
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn classify_error(address: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: address.to_string(),
        }
    } else {
        FetchError::Request {
            url: address.to_string(),
            source: error,
        }
    }
}
