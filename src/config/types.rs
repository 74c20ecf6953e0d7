use crate::state::DedupPolicy;
use serde::Deserialize;

/// Main configuration structure for Ripple-Crawl
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub limits: LimitsConfig,
    pub fetcher: FetcherConfig,
}

/// Crawl shape configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Address the root crawl task starts from
    pub seed_url: String,

    /// Initial depth bound; tasks at or beyond it are not fetched
    pub max_depth: u32,

    /// Amount the depth bound grows by on each operator request
    pub depth_increment: u32,

    /// How concurrent tasks are kept from fetching the same address
    pub dedup: DedupPolicy,

    /// Capacity of the result channel between crawl tasks and the consumer
    pub result_buffer: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: "https://telegram.org".to_string(),
            max_depth: 3,
            depth_increment: 2,
            dedup: DedupPolicy::default(),
            result_buffer: 16,
        }
    }
}

/// Termination budgets
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LimitsConfig {
    /// Number of successful pages after which the crawl stops
    pub max_results: u32,

    /// Number of failed fetches after which the crawl stops
    pub max_errors: u32,

    /// Overall crawl deadline (seconds)
    pub max_duration: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            max_errors: 5,
            max_duration: 10,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            user_agent: format!("ripple-crawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
