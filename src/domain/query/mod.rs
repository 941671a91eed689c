//! Query domain — search text and sort preference.

pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering applied to the asset list and the portfolio list.
///
/// The holdings family shares the rank comparators: `Holdings` sorts like
/// `Rank`, `HoldingsDescending` like `RankDescending`. The portfolio list is
/// always rank-ordered; price options fall back to ascending rank there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    Rank,
    RankDescending,
    Price,
    PriceDescending,
    #[default]
    Holdings,
    HoldingsDescending,
}

impl SortOption {
    pub const ALL: [SortOption; 6] = [
        SortOption::Rank,
        SortOption::RankDescending,
        SortOption::Price,
        SortOption::PriceDescending,
        SortOption::Holdings,
        SortOption::HoldingsDescending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Rank => "rank",
            SortOption::RankDescending => "rankDescending",
            SortOption::Price => "price",
            SortOption::PriceDescending => "priceDescending",
            SortOption::Holdings => "holdings",
            SortOption::HoldingsDescending => "holdingsDescending",
        }
    }

    pub fn is_holdings_family(&self) -> bool {
        matches!(self, SortOption::Holdings | SortOption::HoldingsDescending)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("Unknown sort option: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_holdings() {
        assert_eq!(SortOption::default(), SortOption::Holdings);
    }

    #[test]
    fn test_str_forms_match_serde() {
        for option in SortOption::ALL {
            let json = serde_json::to_string(&option).unwrap();
            assert_eq!(json, format!("\"{}\"", option.as_str()));
            assert_eq!(option.as_str().parse::<SortOption>().unwrap(), option);
        }
        assert!("alphabetical".parse::<SortOption>().is_err());
    }
}
