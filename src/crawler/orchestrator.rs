//! Crawl orchestrator - recursive fan-out of crawl tasks
//!
//! Every crawl task handles one (address, depth) pair:
//! - Skips the address if the depth bound is reached
//! - Skips the address if it was already visited (or is in flight)
//! - Skips everything once the crawl is cancelled
//! - Fetches the page, publishes one outcome, and spawns a task per link
//!
//! Fan-out is unbounded: one tokio task per discovered link, limited only by
//! the depth bound, deduplication, and the termination budgets.

use crate::config::CrawlerConfig;
use crate::crawler::source::{Page, PageSource};
use crate::output::{result_channel, CrawlOutcome, ResultSender, ResultStream};
use crate::state::{DedupPolicy, DepthBound, VisitedRegistry};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// The recursive crawl scheduler
///
/// Owns the visited registry and the producer side of the result stream. The
/// stream ends once the last `Arc<Crawler>` is dropped, which happens when
/// every task has finished and the caller has released its handle.
pub struct Crawler {
    source: Arc<dyn PageSource>,
    visited: Arc<VisitedRegistry>,
    depth: Arc<DepthBound>,
    results: ResultSender,
    dedup: DedupPolicy,
    tasks: TaskTracker,
}

impl Crawler {
    /// Creates a crawler and the stream its outcomes arrive on
    pub fn new(
        source: Arc<dyn PageSource>,
        depth: Arc<DepthBound>,
        dedup: DedupPolicy,
        result_buffer: usize,
    ) -> (Arc<Self>, ResultStream) {
        let (results, stream) = result_channel(result_buffer);

        let crawler = Arc::new(Self {
            source,
            visited: Arc::new(VisitedRegistry::new()),
            depth,
            results,
            dedup,
            tasks: TaskTracker::new(),
        });

        (crawler, stream)
    }

    /// Creates a crawler from the `[crawler]` configuration section
    pub fn from_config(
        source: Arc<dyn PageSource>,
        config: &CrawlerConfig,
    ) -> (Arc<Self>, ResultStream) {
        Self::new(
            source,
            Arc::new(DepthBound::new(config.max_depth)),
            config.dedup,
            config.result_buffer,
        )
    }

    pub fn depth_bound(&self) -> &Arc<DepthBound> {
        &self.depth
    }

    pub fn visited(&self) -> &Arc<VisitedRegistry> {
        &self.visited
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
    }

    /// Handle for waiting on every task this crawler has spawned
    pub fn tasks(&self) -> TaskTracker {
        self.tasks.clone()
    }

    /// Spawns a crawl task for `address` at `depth`
    ///
    /// Fire-and-forget: the caller never waits for the task. A panic inside
    /// the task is caught and logged here; it ends only that branch.
    pub fn dispatch(self: &Arc<Self>, token: CancellationToken, address: String, depth: u32) {
        let crawler = Arc::clone(self);

        self.tasks.spawn(async move {
            let scan = AssertUnwindSafe(crawler.scan(&token, &address, depth));
            if let Err(panic) = scan.catch_unwind().await {
                tracing::error!(
                    url = %address,
                    depth,
                    "Crawl task panicked: {}",
                    panic_message(panic.as_ref())
                );
            }
        });
    }

    /// Waits until no crawl task is running
    ///
    /// Tasks only spawn children before they finish, so once the count
    /// reaches zero no further work happens without a new dispatch.
    pub async fn wait_idle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Processes one crawl task
    ///
    /// Communicates only through the visited registry and the result stream.
    pub async fn scan(self: &Arc<Self>, token: &CancellationToken, address: &str, depth: u32) {
        let max_depth = self.depth.current();

        if depth >= max_depth {
            tracing::debug!(url = address, depth, max_depth, "Max depth reached");
            return;
        }

        let reservation = match self.dedup {
            DedupPolicy::MarkOnSuccess => {
                if self.visited.contains(address) {
                    tracing::debug!(url = address, depth, max_depth, "URL already visited");
                    return;
                }
                None
            }
            DedupPolicy::ReserveOnDispatch => match self.visited.try_reserve(address) {
                Some(reservation) => Some(reservation),
                None => {
                    tracing::debug!(url = address, depth, max_depth, "URL already visited");
                    return;
                }
            },
        };

        if token.is_cancelled() {
            tracing::debug!(url = address, depth, max_depth, "Crawl cancelled");
            return;
        }

        let page = match self.source.fetch(token, address).await {
            Ok(Some(page)) => page,
            Ok(None) => {
                tracing::debug!(url = address, depth, max_depth, "Fetch aborted by cancellation");
                return;
            }
            Err(err) => {
                tracing::debug!(url = address, depth, max_depth, "Fetch failed: {}", err);
                // Failed addresses stay unvisited so another branch may retry them.
                drop(reservation);
                self.results.publish(CrawlOutcome::Failed(err), token).await;
                return;
            }
        };

        match reservation {
            Some(reservation) => reservation.complete(),
            None => self.visited.mark_visited(address),
        }

        let Page { title, links } = page;
        let outcome = CrawlOutcome::Page {
            url: address.to_string(),
            title,
        };
        if !self.results.publish(outcome, token).await {
            tracing::debug!(url = address, depth, max_depth, "Result dropped, crawl is stopping");
            return;
        }

        for link in links {
            tracing::debug!(url = address, depth, max_depth, "Start scan {}", link);
            self.dispatch(token.clone(), link, depth + 1);
        }
    }
}

impl std::fmt::Debug for Crawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("depth", &self.depth.current())
            .field("visited", &self.visited.len())
            .field("dedup", &self.dedup)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
