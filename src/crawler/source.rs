//! The page source seam between the orchestrator and the network

use crate::FetchError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A fetched page as the orchestrator sees it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Text of the first `<title>`, empty when the page has none
    pub title: String,

    /// Outbound link targets, in document order
    pub links: Vec<String>,
}

impl Page {
    pub fn new(title: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            title: title.into(),
            links,
        }
    }
}

/// Fetches a page and extracts its title and links
///
/// Implementations must respect the token: once it fires they return
/// `Ok(None)` promptly instead of finishing the fetch. An already-cancelled
/// token is a no-op, not an error.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(
        &self,
        token: &CancellationToken,
        address: &str,
    ) -> Result<Option<Page>, FetchError>;
}
