//! Asset domain — tradable instruments, validation, detail, the asset store.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod detail;
pub mod state;
pub mod wire;

use crate::shared::AssetId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Asset ───────────────────────────────────────────────────────────────────

/// Immutable snapshot of one tradable instrument at fetch time.
///
/// `id` is unique within one fetch and stable across fetches; it is the merge
/// key against holdings records. Optional figures stay `None` when the source
/// omits them; consumers apply their own per-field default (e.g. a missing
/// `rank` sorts last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    /// 1 = largest by market cap.
    pub rank: Option<u32>,
    pub current_price: Decimal,
    pub price_change_percent_24h: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub total_volume: Option<Decimal>,
    pub high_24h: Option<Decimal>,
    pub low_24h: Option<Decimal>,
    pub price_change_24h: Option<Decimal>,
    pub market_cap_change_24h: Option<Decimal>,
    pub market_cap_change_percent_24h: Option<Decimal>,
    /// 7-day price series, oldest first. Charting only.
    pub sparkline: Option<Vec<Decimal>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Asset {
    /// Minimal asset with every optional figure absent.
    pub fn new(
        id: impl Into<AssetId>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        rank: Option<u32>,
        current_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            rank,
            current_price,
            price_change_percent_24h: None,
            market_cap: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_24h: None,
            market_cap_change_24h: None,
            market_cap_change_percent_24h: None,
            sparkline: None,
            last_updated: None,
        }
    }

    /// Whether `name` or `symbol` contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

// ─── AssetDetail ─────────────────────────────────────────────────────────────

/// Descriptive data for one asset, fetched on demand (not part of the list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetail {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub block_time_minutes: Option<u32>,
    pub hashing_algorithm: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub subreddit: Option<String>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ValidationError {
    Multiple(String, Vec<ValidationError>),
    MissingId,
    MissingSymbol,
    MissingName,
    MissingPrice,
    NegativeValue(&'static str),
    NonFiniteValue(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Multiple(id, errors) => {
                writeln!(f, "Asset validation errors ({id}):")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            ValidationError::MissingId => write!(f, "Missing id"),
            ValidationError::MissingSymbol => write!(f, "Missing symbol"),
            ValidationError::MissingName => write!(f, "Missing name"),
            ValidationError::MissingPrice => write!(f, "Missing current price"),
            ValidationError::NegativeValue(field) => write!(f, "Negative {}", field),
            ValidationError::NonFiniteValue(field) => write!(f, "Non-finite {}", field),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_matches_search_name_or_symbol() {
        let eth = Asset::new("ethereum", "eth", "Ethereum", Some(2), dec("3000"));
        assert!(eth.matches_search("eth"));
        assert!(eth.matches_search("ereum"));
        assert!(!eth.matches_search("btc"));
    }

    #[test]
    fn test_matches_search_case_insensitive_fields() {
        let btc = Asset::new("bitcoin", "BTC", "Bitcoin", Some(1), dec("50000"));
        assert!(btc.matches_search("btc"));
        assert!(btc.matches_search("bitc"));
    }

    #[test]
    fn test_validation_error_display_lists_all() {
        let err = ValidationError::Multiple(
            "bogus".to_string(),
            vec![ValidationError::MissingPrice, ValidationError::NegativeValue("market_cap")],
        );
        let text = err.to_string();
        assert!(text.contains("(bogus)"));
        assert!(text.contains("Missing current price"));
        assert!(text.contains("Negative market_cap"));
    }
}
