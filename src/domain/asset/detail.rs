//! Detail-screen statistics for a single asset.
//!
//! Built from the list snapshot (`Asset`) plus the on-demand `AssetDetail`,
//! which may not have arrived yet. Missing figures render as `"n/a"`; missing
//! detail-only figures render as `"N/A"`.

use super::{Asset, AssetDetail};
use crate::domain::market_stats::Statistic;
use crate::shared::fmt::{abbr_currency, currency_compact};

const NOT_AVAILABLE: &str = "n/a";
const DETAIL_NOT_AVAILABLE: &str = "N/A";

/// Current Price, Market Capitalization, Rank, Volume.
pub fn overview_statistics(asset: &Asset) -> Vec<Statistic> {
    let price = Statistic::new("Current Price", currency_compact(&asset.current_price, "$"))
        .with_change(asset.price_change_percent_24h);

    let market_cap = Statistic::new(
        "Market Capitalization",
        asset
            .market_cap
            .map(|v| abbr_currency(&v, "$"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    )
    .with_change(asset.market_cap_change_percent_24h);

    let rank = Statistic::new(
        "Rank",
        asset
            .rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );

    let volume = Statistic::new(
        "Volume",
        asset
            .total_volume
            .map(|v| abbr_currency(&v, "$"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );

    vec![price, market_cap, rank, volume]
}

/// 24h High, 24h Low, 24h Price Change, 24h Market Cap Change, Block Time,
/// Hashing Algorithm.
pub fn additional_statistics(asset: &Asset, detail: Option<&AssetDetail>) -> Vec<Statistic> {
    let money = |value: Option<rust_decimal::Decimal>| {
        value
            .map(|v| currency_compact(&v, "$"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let high = Statistic::new("24h High", money(asset.high_24h));
    let low = Statistic::new("24h Low", money(asset.low_24h));
    let price_change = Statistic::new("24h Price Change", money(asset.price_change_24h))
        .with_change(asset.price_change_percent_24h);
    let market_cap_change = Statistic::new(
        "24h Market Cap Change",
        asset
            .market_cap_change_24h
            .map(|v| abbr_currency(&v, "$"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    )
    .with_change(asset.market_cap_change_percent_24h);

    // Zero block time means the chain does not report one.
    let block_time = detail
        .and_then(|d| d.block_time_minutes)
        .filter(|minutes| *minutes > 0)
        .map(|minutes| minutes.to_string())
        .unwrap_or_else(|| DETAIL_NOT_AVAILABLE.to_string());

    let hashing = detail
        .and_then(|d| d.hashing_algorithm.clone())
        .unwrap_or_else(|| DETAIL_NOT_AVAILABLE.to_string());

    vec![
        high,
        low,
        price_change,
        market_cap_change,
        Statistic::new("Block Time", block_time),
        Statistic::new("Hashing Algorithm", hashing),
    ]
}
