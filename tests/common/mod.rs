//! Synthetic page sources shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ripple_crawl::config::{Config, CrawlerConfig, FetcherConfig, LimitsConfig};
use ripple_crawl::{DedupPolicy, FetchError, Page, PageSource};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Creates a test configuration with the given depth bound and budgets
pub fn create_test_config(max_depth: u32, max_results: u32, max_errors: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: "localhost".to_string(),
            max_depth,
            depth_increment: 2,
            dedup: DedupPolicy::ReserveOnDispatch,
            result_buffer: 16,
        },
        limits: LimitsConfig {
            max_results,
            max_errors,
            max_duration: 5,
        },
        fetcher: FetcherConfig::default(),
    }
}

/// Sleeps for `delay` unless the token fires first; returns false if cancelled
async fn wait_or_cancel(token: &CancellationToken, delay: Duration) -> bool {
    if delay.is_zero() {
        return !token.is_cancelled();
    }
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Records every fetch attempt in order
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    fn record(&self, address: &str) {
        self.calls.lock().unwrap().push(address.to_string());
    }

    pub fn all(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count(&self, address: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.as_str() == address)
            .count()
    }
}

/// An infinite numeric link tree
///
/// `localhost` links to `1` and `2`; every number `n` links to `10n` and
/// `10n + 1`. Anything else fails.
#[derive(Default)]
pub struct NumericSource {
    delay: Duration,
    pub calls: CallLog,
}

impl NumericSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: CallLog::default(),
        })
    }

    fn links_for(address: &str) -> Option<Vec<String>> {
        if address == "localhost" {
            return Some(vec!["1".to_string(), "2".to_string()]);
        }
        let n: u64 = address.parse().ok()?;
        Some(match n.checked_mul(10) {
            Some(base) => vec![base.to_string(), (base + 1).to_string()],
            None => Vec::new(),
        })
    }
}

#[async_trait]
impl PageSource for NumericSource {
    async fn fetch(
        &self,
        token: &CancellationToken,
        address: &str,
    ) -> Result<Option<Page>, FetchError> {
        self.calls.record(address);

        if !wait_or_cancel(token, self.delay).await {
            return Ok(None);
        }

        match Self::links_for(address) {
            Some(links) => Ok(Some(Page::new("TestTitle", links))),
            None => Err(FetchError::Unavailable {
                url: address.to_string(),
                reason: "not a numeric page".to_string(),
            }),
        }
    }
}

/// A hand-built link graph with failing, panicking and slow pages
#[derive(Default)]
pub struct GraphSource {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    pub calls: CallLog,
}

impl GraphSource {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn page(mut self, address: &str, links: &[&str]) -> Self {
        self.pages.insert(
            address.to_string(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    pub fn panicking(mut self, address: &str) -> Self {
        self.panicking.insert(address.to_string());
        self
    }

    pub fn delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl PageSource for GraphSource {
    async fn fetch(
        &self,
        token: &CancellationToken,
        address: &str,
    ) -> Result<Option<Page>, FetchError> {
        self.calls.record(address);

        let delay = self
            .delays
            .get(address)
            .copied()
            .unwrap_or(self.default_delay);
        if !wait_or_cancel(token, delay).await {
            return Ok(None);
        }

        if self.panicking.contains(address) {
            panic!("page source blew up on {}", address);
        }

        if self.failing.contains(address) {
            return Err(FetchError::Unavailable {
                url: address.to_string(),
                reason: "synthetic failure".to_string(),
            });
        }

        match self.pages.get(address) {
            Some(links) => Ok(Some(Page::new(format!("Title {}", address), links.clone()))),
            None => Err(FetchError::Unavailable {
                url: address.to_string(),
                reason: "no such page".to_string(),
            }),
        }
    }
}

/// Sorted copy of the urls of a report's pages
pub fn sorted_urls(report: &ripple_crawl::CrawlReport) -> Vec<String> {
    let mut urls: Vec<String> = report.pages.iter().map(|p| p.url.clone()).collect();
    urls.sort();
    urls
}
