//! Wire types for the `/global` response.

use crate::shared::serde_util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `/global` wraps its payload in a `data` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalResponse {
    pub data: GlobalDataResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalDataResponse {
    #[serde(default)]
    pub active_cryptocurrencies: Option<u32>,
    #[serde(default)]
    pub markets: Option<u32>,
    #[serde(default, deserialize_with = "serde_util::null_as_default::deserialize")]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default, deserialize_with = "serde_util::null_as_default::deserialize")]
    pub total_volume: HashMap<String, f64>,
    #[serde(default, deserialize_with = "serde_util::null_as_default::deserialize")]
    pub market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h_usd: Option<f64>,
    #[serde(
        default,
        deserialize_with = "serde_util::timestamp_secs_option::deserialize",
        skip_serializing
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_response_deserializes() {
        let json = r#"{
            "data": {
                "active_cryptocurrencies": 13690,
                "markets": 1046,
                "total_market_cap": {"btc": 39000000.5, "usd": 2400000000000.0},
                "total_volume": {"usd": 85000000000.0},
                "market_cap_percentage": {"btc": 52.4, "eth": 16.9},
                "market_cap_change_percentage_24h_usd": -1.25,
                "updated_at": 1714564800
            }
        }"#;
        let resp: GlobalResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.markets, Some(1046));
        assert_eq!(resp.data.market_cap_percentage.get("btc"), Some(&52.4));
        assert_eq!(resp.data.updated_at.unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn test_global_response_tolerates_nulls() {
        let json = r#"{"data": {"total_market_cap": null, "updated_at": null}}"#;
        let resp: GlobalResponse = serde_json::from_str(json).unwrap();
        assert!(resp.data.total_market_cap.is_empty());
        assert!(resp.data.updated_at.is_none());
        assert!(resp.data.market_cap_change_percentage_24h_usd.is_none());
    }
}
