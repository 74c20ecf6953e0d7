//! Result stream between crawl tasks and their single consumer
//!
//! Any number of crawl tasks publish through cloned `ResultSender`s; exactly
//! one `ResultStream` drains them. The stream ends once every sender is gone.

use crate::FetchError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

/// Outcome of one attempted fetch
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The page was fetched and parsed
    Page { url: String, title: String },

    /// The page source failed for this address
    Failed(FetchError),
}

impl CrawlOutcome {
    /// The address this outcome is about
    pub fn url(&self) -> &str {
        match self {
            CrawlOutcome::Page { url, .. } => url,
            CrawlOutcome::Failed(err) => err.url(),
        }
    }
}

/// Creates a connected sender/stream pair
///
/// `capacity` bounds how many outcomes may wait for the consumer before
/// publishers start to block; values below 1 are raised to 1.
pub fn result_channel(capacity: usize) -> (ResultSender, ResultStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ResultSender { tx }, ResultStream { rx })
}

/// Producer handle held by the crawler
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::Sender<CrawlOutcome>,
}

impl ResultSender {
    /// Publishes an outcome, giving up if the token fires first
    ///
    /// Returns false if the outcome was dropped, either because the crawl was
    /// cancelled while waiting for room or because the consumer is gone.
    pub async fn publish(&self, outcome: CrawlOutcome, token: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = token.cancelled() => false,
            sent = self.tx.send(outcome) => sent.is_ok(),
        }
    }
}

/// Consumer end of the result channel
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<CrawlOutcome>,
}

impl ResultStream {
    /// Waits for the next outcome; `None` once every producer has exited
    pub async fn recv(&mut self) -> Option<CrawlOutcome> {
        self.rx.recv().await
    }

    /// Returns a buffered outcome without waiting
    pub fn try_recv(&mut self) -> Option<CrawlOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Stops accepting outcomes; pending publishers fail immediately
    pub fn close(&mut self) {
        self.rx.close();
    }
}
