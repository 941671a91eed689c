//! Market stats sub-client — global market figures.

use crate::client::CoinboardClient;
use crate::domain::market_stats::{self, GlobalStats};
use crate::error::FetchError;

/// Sub-client for whole-market statistics.
pub struct MarketStats<'a> {
    pub(crate) client: &'a CoinboardClient,
}

impl<'a> MarketStats<'a> {
    /// Current global market figures.
    pub async fn global(&self) -> Result<GlobalStats, FetchError> {
        let resp = self.client.http.get_global().await?;
        let stats: GlobalStats = resp
            .try_into()
            .map_err(|e: market_stats::ValidationError| FetchError::Validation(e.to_string()))?;
        tracing::debug!(
            currencies = stats.total_market_cap.len(),
            "Fetched global stats"
        );
        Ok(stats)
    }
}
