//! Source adapters for the Veris content crawler.
//!
//! Each adapter fetches raw items from one external source (RSS feeds or
//! Reddit subreddit listings) and normalizes them into
//! [`RawItem`](veris_core::RawItem)s. A failure in one feed or subreddit is
//! logged and skipped inside the adapter; the orchestrator treats a failed
//! adapter as having yielded nothing this cycle.

pub mod error;

mod reddit;
mod rss;

use async_trait::async_trait;
use veris_core::RawItem;

pub use error::SourceError;
pub use reddit::RedditAdapter;
pub use rss::RssAdapter;

/// One external content source.
///
/// Adapters do not retry internally; the orchestrator retries at cycle
/// granularity only.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short label for logs, e.g. `"rss"` or `"reddit"`.
    fn name(&self) -> &str;

    /// Fetch the current items from this source.
    async fn fetch(&self) -> Result<Vec<RawItem>, SourceError>;
}
