//! Assets sub-client — markets list and cached coin detail.

use crate::client::CoinboardClient;
use crate::domain::asset::convert::assets_from_markets;
use crate::domain::asset::{Asset, AssetDetail};
use crate::error::FetchError;
use crate::shared::AssetId;
use std::time::Instant;

/// Sub-client for asset operations.
pub struct Assets<'a> {
    pub(crate) client: &'a CoinboardClient,
}

impl<'a> Assets<'a> {
    /// First page of assets by market cap, validated.
    ///
    /// Rows that fail validation are dropped with a warning rather than
    /// failing the whole fetch.
    pub async fn markets(&self) -> Result<Vec<Asset>, FetchError> {
        let rows = self
            .client
            .http
            .get_coin_markets(&self.client.vs_currency, self.client.per_page, 1)
            .await?;
        let received = rows.len();
        let assets = assets_from_markets(rows);
        tracing::debug!(received, kept = assets.len(), "Fetched markets");
        Ok(assets)
    }

    /// Descriptive detail for one asset. Uses TTL cache.
    pub async fn detail(&self, id: &AssetId) -> Result<AssetDetail, FetchError> {
        {
            let cache = self.client.detail_cache.read().await;
            if let Some((detail, fetched_at)) = cache.get(id) {
                if fetched_at.elapsed() < self.client.detail_cache_ttl {
                    return Ok(detail.clone());
                }
            }
        }

        let resp = self.client.http.get_coin_detail(id.as_str()).await?;
        let detail = AssetDetail::from(resp);
        if detail.id != *id {
            return Err(FetchError::Validation(format!(
                "Requested detail for {} but received {}",
                id, detail.id
            )));
        }

        self.client
            .detail_cache
            .write()
            .await
            .insert(id.clone(), (detail.clone(), Instant::now()));
        Ok(detail)
    }

    /// Invalidate a cached detail entry.
    pub async fn invalidate_detail(&self, id: &AssetId) {
        self.client.detail_cache.write().await.remove(id);
    }

    /// Clear the detail cache.
    pub async fn clear_cache(&self) {
        self.client.detail_cache.write().await.clear();
    }
}
