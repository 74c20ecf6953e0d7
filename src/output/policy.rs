//! Termination policy: the single consumer of the result stream
//!
//! The policy counts successes and errors against their budgets and stops
//! draining once either budget is spent, the crawl is cancelled, or the stream
//! ends. Spending a budget cancels the crawl.

use crate::config::LimitsConfig;
use crate::output::report::CrawledPage;
use crate::output::stream::{CrawlOutcome, ResultStream};
use tokio_util::sync::CancellationToken;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The result budget reached zero
    ResultBudget,
    /// The error budget reached zero
    ErrorBudget,
    /// The crawl was cancelled from outside (operator shutdown)
    Cancelled,
    /// The overall deadline expired
    DeadlineExceeded,
    /// Every crawl task finished before any other condition fired
    Exhausted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::ResultBudget => "result budget reached",
            StopReason::ErrorBudget => "error budget reached",
            StopReason::Cancelled => "cancelled",
            StopReason::DeadlineExceeded => "deadline exceeded",
            StopReason::Exhausted => "crawl exhausted",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the policy observed before it stopped
#[derive(Debug)]
pub struct DrainSummary {
    pub pages: Vec<CrawledPage>,
    pub errors: Vec<String>,
    pub reason: StopReason,
}

/// Result and error budgets for one crawl
#[derive(Debug, Clone, Copy)]
pub struct TerminationPolicy {
    max_results: u32,
    max_errors: u32,
}

impl TerminationPolicy {
    pub fn new(max_results: u32, max_errors: u32) -> Self {
        Self {
            max_results,
            max_errors,
        }
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(limits.max_results, limits.max_errors)
    }

    /// Drains outcomes until a stopping condition fires
    ///
    /// Moves from draining to stopped exactly once. Outcomes still buffered
    /// when the policy stops are left unread.
    pub async fn drain(&self, results: &mut ResultStream, token: &CancellationToken) -> DrainSummary {
        let mut remaining_results = self.max_results;
        let mut remaining_errors = self.max_errors;
        let mut pages = Vec::new();
        let mut errors = Vec::new();

        let reason = loop {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => break StopReason::Cancelled,
                outcome = results.recv() => outcome,
            };

            match outcome {
                None => break StopReason::Exhausted,
                Some(CrawlOutcome::Failed(err)) => {
                    remaining_errors = remaining_errors.saturating_sub(1);
                    tracing::error!("Crawler result returned error: {}", err);
                    errors.push(err.to_string());

                    if remaining_errors == 0 {
                        tracing::info!("Error budget of {} exhausted", self.max_errors);
                        token.cancel();
                        break StopReason::ErrorBudget;
                    }
                }
                Some(CrawlOutcome::Page { url, title }) => {
                    remaining_results = remaining_results.saturating_sub(1);
                    tracing::info!("Crawler result: [url: {}] Title: {}", url, title);
                    pages.push(CrawledPage { url, title });

                    if remaining_results == 0 {
                        tracing::info!("Result budget of {} exhausted", self.max_results);
                        token.cancel();
                        break StopReason::ResultBudget;
                    }
                }
            }
        };

        DrainSummary {
            pages,
            errors,
            reason,
        }
    }
}
