//! Crawl report types and output errors

use crate::output::policy::StopReason;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    pub url: String,
    pub title: String,
}

/// Summary of a finished crawl session
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed address the crawl started from
    pub seed_url: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Pages counted by the termination policy, in arrival order
    pub pages: Vec<CrawledPage>,

    /// Error messages counted by the termination policy, in arrival order
    pub errors: Vec<String>,

    pub stop_reason: StopReason,

    /// Number of distinct addresses marked visited
    pub visited: usize,

    /// Depth bound in effect when the crawl stopped
    pub final_depth: u32,
}

impl CrawlReport {
    pub fn success_count(&self) -> usize {
        self.pages.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Wall-clock time between start and finish
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Percentage of counted outcomes that were successes
    pub fn success_rate(&self) -> f64 {
        let total = self.success_count() + self.error_count();
        if total == 0 {
            0.0
        } else {
            (self.success_count() as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> CrawlReport {
    let started_at = Utc::now();
    CrawlReport {
        seed_url: "https://example.com/".to_string(),
        started_at,
        finished_at: started_at + chrono::Duration::milliseconds(1500),
        pages: vec![
            CrawledPage {
                url: "https://example.com/".to_string(),
                title: "Home".to_string(),
            },
            CrawledPage {
                url: "https://example.com/a".to_string(),
                title: "A | Example".to_string(),
            },
            CrawledPage {
                url: "https://example.com/b".to_string(),
                title: String::new(),
            },
        ],
        errors: vec!["HTTP 404 for https://example.com/missing".to_string()],
        stop_reason: StopReason::ResultBudget,
        visited: 3,
        final_depth: 3,
    }
}
