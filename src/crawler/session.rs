//! Crawl session - one complete crawl run
//!
//! A session wires the orchestrator to its termination policy:
//! 1. Start the deadline timer
//! 2. Dispatch the root task at depth 0
//! 3. Drain results until a budget, the deadline, or the operator stops it
//! 4. Cancel whatever is still running and wait for every task to exit
//! 5. Return the crawl report

use crate::config::Config;
use crate::crawler::orchestrator::Crawler;
use crate::crawler::source::PageSource;
use crate::output::{CrawlReport, ResultStream, StopReason, TerminationPolicy};
use crate::state::DepthBound;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Operator-facing handle on a running session
///
/// Cheap to clone; safe to use from signal handlers and other tasks.
#[derive(Debug, Clone)]
pub struct CrawlControls {
    token: CancellationToken,
    depth: Arc<DepthBound>,
    depth_increment: u32,
}

impl CrawlControls {
    /// Requests a graceful shutdown. Idempotent.
    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("Shutdown requested");
        }
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Raises the depth bound by the configured increment
    ///
    /// Only tasks dispatched afterwards see the new bound; branches that
    /// already stopped at the old bound stay stopped.
    pub fn increase_depth(&self) -> u32 {
        self.increase_depth_by(self.depth_increment)
    }

    /// Raises the depth bound by `delta`
    pub fn increase_depth_by(&self, delta: u32) -> u32 {
        let bound = self.depth.increase(delta);
        tracing::info!("Depth bound raised by {} to {}", delta, bound);
        bound
    }

    /// Current depth bound
    pub fn depth(&self) -> u32 {
        self.depth.current()
    }
}

/// One crawl run: orchestrator, result stream, cancellation and deadline
pub struct CrawlSession {
    crawler: Arc<Crawler>,
    results: ResultStream,
    token: CancellationToken,
    policy: TerminationPolicy,
    deadline: Duration,
    depth_increment: u32,
}

impl CrawlSession {
    /// Creates a session from configuration
    pub fn new(source: Arc<dyn PageSource>, config: &Config) -> Self {
        let (crawler, results) = Crawler::from_config(source, &config.crawler);

        Self {
            crawler,
            results,
            token: CancellationToken::new(),
            policy: TerminationPolicy::from_limits(&config.limits),
            deadline: Duration::from_secs(config.limits.max_duration),
            depth_increment: config.crawler.depth_increment,
        }
    }

    /// Overrides the overall deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns a handle for shutdown and depth increases
    pub fn controls(&self) -> CrawlControls {
        CrawlControls {
            token: self.token.clone(),
            depth: Arc::clone(self.crawler.depth_bound()),
            depth_increment: self.depth_increment,
        }
    }

    /// Runs the crawl from `seed` until it stops, then waits for quiescence
    pub async fn run(self, seed: &str) -> CrawlReport {
        let Self {
            crawler,
            mut results,
            token,
            policy,
            deadline,
            ..
        } = self;

        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl at {} (depth bound {}, dedup {:?}, deadline {:?})",
            seed,
            crawler.depth_bound().current(),
            crawler.dedup_policy(),
            deadline
        );

        let deadline_timer = tokio::spawn(watch_deadline(token.clone(), deadline));

        crawler.dispatch(token.clone(), seed.to_string(), 0);

        let tasks = crawler.tasks();
        let visited = Arc::clone(crawler.visited());
        let depth = Arc::clone(crawler.depth_bound());
        // Tasks hold the only remaining handles, so the stream ends when they do.
        drop(crawler);

        let summary = policy.drain(&mut results, &token).await;

        // Stop whatever is still running; a no-op if the policy already cancelled.
        token.cancel();
        results.close();
        tasks.close();
        tasks.wait().await;

        let deadline_hit = deadline_timer.await.unwrap_or(false);
        let stop_reason = match summary.reason {
            StopReason::Cancelled if deadline_hit => StopReason::DeadlineExceeded,
            reason => reason,
        };

        let report = CrawlReport {
            seed_url: seed.to_string(),
            started_at,
            finished_at: Utc::now(),
            pages: summary.pages,
            errors: summary.errors,
            stop_reason,
            visited: visited.len(),
            final_depth: depth.current(),
        };

        tracing::info!(
            "Crawl stopped ({}): {} pages, {} errors in {:?}",
            report.stop_reason,
            report.success_count(),
            report.error_count(),
            report.duration().to_std().unwrap_or_default()
        );

        report
    }
}

/// Cancels the crawl once `deadline` elapses
///
/// Returns true if the deadline fired, false if the crawl stopped first.
async fn watch_deadline(token: CancellationToken, deadline: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(deadline) => {
            tracing::info!("Deadline of {:?} reached", deadline);
            token.cancel();
            true
        }
    }
}
