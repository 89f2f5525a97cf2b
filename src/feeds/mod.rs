use crate::feeds::error::FeedError;
use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord};

pub(crate) mod client;
pub use client::FeedClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Read access to the two arbitrage signal feeds.
///
/// Each call issues exactly one request and never retries; the refresh
/// controller's next cycle is the retry mechanism.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ArbitrageFeed: Send + Sync {
    /// Fetch the pair opportunities.
    async fn fetch_pairs(&self) -> Result<Vec<ArbitragePairRecord>, FeedError>;

    /// Fetch the per-coin track opportunities, in the feed's key order.
    async fn fetch_track(&self) -> Result<Vec<ArbitrageTrackRecord>, FeedError>;
}
