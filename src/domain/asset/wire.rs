//! Wire types for asset responses (REST).
//!
//! Numbers arrive as JSON floats and may be `null`; conversion to `Decimal`
//! and validation happen in `convert.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── /coins/markets ──────────────────────────────────────────────────────────

/// One row of the `/coins/markets` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinMarketResponse {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparkline_in_7d: Option<SparklineResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparklineResponse {
    #[serde(default)]
    pub price: Vec<f64>,
}

// ─── /coins/{id} ─────────────────────────────────────────────────────────────

/// Subset of the `/coins/{id}` response used for detail statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinDetailResponse {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub block_time_in_minutes: Option<u32>,
    #[serde(default)]
    pub hashing_algorithm: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub description: Option<DescriptionResponse>,
    #[serde(default)]
    pub links: Option<LinksResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptionResponse {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinksResponse {
    #[serde(default)]
    pub homepage: Option<Vec<String>>,
    #[serde(default)]
    pub subreddit_url: Option<String>,
}
