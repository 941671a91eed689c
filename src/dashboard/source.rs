//! Market-data collaborator seen by the dashboard runtime.

use crate::domain::asset::Asset;
use crate::domain::market_stats::GlobalStats;
use crate::error::FetchError;
use async_trait::async_trait;

/// Where asset lists and global stats come from.
///
/// Implementations own retry and decoding; the runtime only sees the final
/// value or the failure.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_assets(&self) -> Result<Vec<Asset>, FetchError>;

    async fn fetch_global_stats(&self) -> Result<GlobalStats, FetchError>;
}

#[cfg(feature = "http")]
#[async_trait]
impl MarketDataSource for crate::client::CoinboardClient {
    async fn fetch_assets(&self) -> Result<Vec<Asset>, FetchError> {
        self.assets().markets().await
    }

    async fn fetch_global_stats(&self) -> Result<GlobalStats, FetchError> {
        self.market_stats().global().await
    }
}
