//! High-level client — `CoinboardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.
//! `CoinboardClient` is also the crate's `MarketDataSource`.

use crate::domain::asset::client::Assets;
use crate::domain::asset::AssetDetail;
use crate::domain::market_stats::client::MarketStats;
use crate::error::CoinboardError;
use crate::http::{CoinGeckoHttp, RetryPolicy};
use crate::network::{DEFAULT_API_URL, DEFAULT_PER_PAGE, DEFAULT_VS_CURRENCY};
use crate::shared::AssetId;

use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::asset::client::Assets as AssetsClient;
pub use crate::domain::market_stats::client::MarketStats as MarketStatsClient;

/// Entry point for CoinGecko market data.
///
/// Cheap to clone; clones share the HTTP connection pool and caches.
#[derive(Clone)]
pub struct CoinboardClient {
    pub(crate) http: CoinGeckoHttp,
    pub(crate) vs_currency: String,
    pub(crate) per_page: u32,
    /// Detail cache: asset id → (detail, fetched_at)
    pub(crate) detail_cache: Arc<RwLock<HashMap<AssetId, (AssetDetail, Instant)>>>,
    pub(crate) detail_cache_ttl: Duration,
}

impl CoinboardClient {
    pub fn builder() -> CoinboardClientBuilder {
        CoinboardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }

    pub fn market_stats(&self) -> MarketStats<'_> {
        MarketStats { client: self }
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.detail_cache.write().await.clear();
    }
}

impl std::fmt::Debug for CoinboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinboardClient")
            .field("base_url", &self.http.base_url())
            .field("vs_currency", &self.vs_currency)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CoinboardClientBuilder {
    base_url: String,
    vs_currency: String,
    per_page: u32,
    api_key: Option<String>,
    retry: RetryPolicy,
    detail_cache_ttl: Duration,
}

impl Default for CoinboardClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            api_key: None,
            retry: RetryPolicy::default(),
            detail_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl CoinboardClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn vs_currency(mut self, currency: &str) -> Self {
        self.vs_currency = currency.to_lowercase();
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Demo API key, sent on every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn detail_cache_ttl(mut self, ttl: Duration) -> Self {
        self.detail_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<CoinboardClient, CoinboardError> {
        if self.per_page == 0 || self.per_page > DEFAULT_PER_PAGE {
            return Err(CoinboardError::Validation(format!(
                "per_page must be between 1 and {}, got {}",
                DEFAULT_PER_PAGE, self.per_page
            )));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(CoinboardError::Validation(
                "vs_currency must not be empty".to_string(),
            ));
        }

        let api_key = self.api_key.filter(|k| !k.trim().is_empty());
        Ok(CoinboardClient {
            http: CoinGeckoHttp::new(&self.base_url, api_key)?.with_retry(self.retry),
            vs_currency: self.vs_currency,
            per_page: self.per_page,
            detail_cache: Arc::new(RwLock::new(HashMap::new())),
            detail_cache_ttl: self.detail_cache_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = CoinboardClient::builder().build().unwrap();
        assert_eq!(client.vs_currency(), "usd");
        assert_eq!(client.per_page, 250);
        assert_eq!(client.http.base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_builder_rejects_bad_page_size() {
        let err = CoinboardClient::builder().per_page(0).build().unwrap_err();
        assert!(matches!(err, CoinboardError::Validation(_)));
        assert!(CoinboardClient::builder().per_page(251).build().is_err());
    }

    #[test]
    fn test_builder_normalizes_currency() {
        let client = CoinboardClient::builder().vs_currency("EUR").build().unwrap();
        assert_eq!(client.vs_currency(), "eur");
    }

    #[tokio::test]
    async fn test_detail_cache_hit_and_clear() {
        let client = CoinboardClient::builder().build().unwrap();
        client.detail_cache.write().await.insert(
            AssetId::from("bitcoin"),
            (
                AssetDetail {
                    id: "bitcoin".into(),
                    symbol: "btc".to_string(),
                    name: "Bitcoin".to_string(),
                    block_time_minutes: Some(10),
                    hashing_algorithm: None,
                    description: None,
                    homepage: None,
                    subreddit: None,
                },
                Instant::now(),
            ),
        );

        // fresh entry served without a request
        let detail = client
            .assets()
            .detail(&AssetId::from("bitcoin"))
            .await
            .unwrap();
        assert_eq!(detail.block_time_minutes, Some(10));

        client.clear_all_caches().await;
        assert!(client.detail_cache.read().await.is_empty());
    }
}
