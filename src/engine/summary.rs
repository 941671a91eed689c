//! Summary figures shown above the asset list.

use crate::domain::holding::PortfolioAsset;
use crate::domain::market_stats::{GlobalStats, Statistic};
use crate::network::DEFAULT_VS_CURRENCY;
use crate::shared::fmt::{abbr_currency, currency, percent};
use rust_decimal::Decimal;

const NOT_AVAILABLE: &str = "N/A";
const DOMINANCE_SYMBOL: &str = "btc";

/// Sum of `holdings_value` over the portfolio, saturating at `Decimal::MAX`.
pub fn portfolio_value(portfolio: &[PortfolioAsset]) -> Decimal {
    portfolio.iter().fold(Decimal::ZERO, |total, p| {
        total.checked_add(p.holdings_value).unwrap_or(Decimal::MAX)
    })
}

/// Empty until global stats exist; then exactly four figures: total market
/// cap, total volume, BTC dominance, portfolio value.
pub fn summarize(stats: Option<&GlobalStats>, portfolio: &[PortfolioAsset]) -> Vec<Statistic> {
    let Some(stats) = stats else {
        return Vec::new();
    };

    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        Statistic::new(
            "Total Market Cap",
            or_na(
                stats
                    .market_cap_in(DEFAULT_VS_CURRENCY)
                    .map(|v| abbr_currency(&v, "$")),
            ),
        )
        .with_change(stats.market_cap_change_percent_24h),
        Statistic::new(
            "Total Market Volume",
            or_na(
                stats
                    .volume_in(DEFAULT_VS_CURRENCY)
                    .map(|v| abbr_currency(&v, "$")),
            ),
        ),
        Statistic::new(
            "BTC Dominance",
            or_na(stats.share_of(DOMINANCE_SYMBOL).map(|v| percent(&v))),
        ),
        Statistic::new("Portfolio", currency(&portfolio_value(portfolio), "$")),
    ]
}
