//! Market stats domain — global market figures and display statistics.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── GlobalStats ─────────────────────────────────────────────────────────────

/// Whole-market figures, keyed by lowercase currency code (`"usd"`, `"btc"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_market_cap: HashMap<String, Decimal>,
    pub total_volume: HashMap<String, Decimal>,
    /// Share of total market cap per asset symbol, in percent units.
    pub market_cap_share: HashMap<String, Decimal>,
    pub market_cap_change_percent_24h: Option<Decimal>,
    pub active_assets: Option<u32>,
    pub markets: Option<u32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GlobalStats {
    /// Total market cap in `currency`, matched case-insensitively.
    pub fn market_cap_in(&self, currency: &str) -> Option<Decimal> {
        lookup(&self.total_market_cap, currency)
    }

    /// Total 24h volume in `currency`, matched case-insensitively.
    pub fn volume_in(&self, currency: &str) -> Option<Decimal> {
        lookup(&self.total_volume, currency)
    }

    /// Market-cap share of `symbol` in percent, matched case-insensitively.
    pub fn share_of(&self, symbol: &str) -> Option<Decimal> {
        lookup(&self.market_cap_share, symbol)
    }
}

fn lookup(map: &HashMap<String, Decimal>, key: &str) -> Option<Decimal> {
    if let Some(value) = map.get(key) {
        return Some(*value);
    }
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| *v)
}

// ─── Statistic ───────────────────────────────────────────────────────────────

/// One titled figure ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    pub title: String,
    pub value: String,
    pub percentage_change: Option<Decimal>,
}

impl Statistic {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            percentage_change: None,
        }
    }

    pub fn with_change(mut self, percentage_change: Option<Decimal>) -> Self {
        self.percentage_change = percentage_change;
        self
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.value)?;
        if let Some(change) = &self.percentage_change {
            write!(f, " ({}%)", change.round_dp(2))?;
        }
        Ok(())
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ValidationError {
    Multiple(Vec<ValidationError>),
    NonFiniteValue(String),
    NegativeValue(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Multiple(errors) => {
                writeln!(f, "Global stats validation errors:")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            ValidationError::NonFiniteValue(field) => write!(f, "Non-finite {}", field),
            ValidationError::NegativeValue(field) => write!(f, "Negative {}", field),
        }
    }
}

impl std::error::Error for ValidationError {}
