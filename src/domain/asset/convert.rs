//! Conversion: CoinMarketResponse → Asset (TryFrom + validation),
//! CoinDetailResponse → AssetDetail.

use super::wire;
use super::{Asset, AssetDetail, ValidationError};
use rust_decimal::prelude::*;
use std::collections::HashSet;

fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue(field));
    }
    Decimal::from_f64(value).ok_or(ValidationError::NonFiniteValue(field))
}

/// Optional figure; absent stays absent, present must be finite.
fn optional(
    field: &'static str,
    value: Option<f64>,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    match value.map(|v| to_decimal(field, v)) {
        Some(Ok(d)) => Some(d),
        Some(Err(err)) => {
            errors.push(err);
            None
        }
        None => None,
    }
}

/// Optional figure that must also be non-negative.
fn optional_non_negative(
    field: &'static str,
    value: Option<f64>,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    let d = optional(field, value, errors)?;
    if d.is_sign_negative() && !d.is_zero() {
        errors.push(ValidationError::NegativeValue(field));
        return None;
    }
    Some(d)
}

impl TryFrom<wire::CoinMarketResponse> for Asset {
    type Error = ValidationError;

    fn try_from(source: wire::CoinMarketResponse) -> Result<Self, Self::Error> {
        let mut errors: Vec<ValidationError> = Vec::new();

        if source.id.trim().is_empty() {
            errors.push(ValidationError::MissingId);
        }
        if source.symbol.trim().is_empty() {
            errors.push(ValidationError::MissingSymbol);
        }
        if source.name.trim().is_empty() {
            errors.push(ValidationError::MissingName);
        }

        let current_price = match source.current_price {
            Some(_) => optional_non_negative("current_price", source.current_price, &mut errors),
            None => {
                errors.push(ValidationError::MissingPrice);
                None
            }
        };

        let market_cap = optional_non_negative("market_cap", source.market_cap, &mut errors);
        let total_volume = optional_non_negative("total_volume", source.total_volume, &mut errors);
        let high_24h = optional_non_negative("high_24h", source.high_24h, &mut errors);
        let low_24h = optional_non_negative("low_24h", source.low_24h, &mut errors);
        let price_change_24h = optional("price_change_24h", source.price_change_24h, &mut errors);
        let price_change_percent_24h = optional(
            "price_change_percentage_24h",
            source.price_change_percentage_24h,
            &mut errors,
        );
        let market_cap_change_24h =
            optional("market_cap_change_24h", source.market_cap_change_24h, &mut errors);
        let market_cap_change_percent_24h = optional(
            "market_cap_change_percentage_24h",
            source.market_cap_change_percentage_24h,
            &mut errors,
        );

        // Chart points that fail conversion are dropped rather than failing the asset.
        let sparkline = source.sparkline_in_7d.map(|s| {
            s.price
                .into_iter()
                .filter_map(|p| to_decimal("sparkline", p).ok())
                .collect::<Vec<_>>()
        });

        let current_price = match current_price {
            Some(price) if errors.is_empty() => price,
            _ => return Err(ValidationError::Multiple(source.id, errors)),
        };

        Ok(Asset {
            id: source.id.into(),
            symbol: source.symbol,
            name: source.name,
            image: source.image,
            rank: source.market_cap_rank,
            current_price,
            price_change_percent_24h,
            market_cap,
            total_volume,
            high_24h,
            low_24h,
            price_change_24h,
            market_cap_change_24h,
            market_cap_change_percent_24h,
            sparkline,
            last_updated: source.last_updated,
        })
    }
}

impl From<wire::CoinDetailResponse> for AssetDetail {
    fn from(source: wire::CoinDetailResponse) -> Self {
        let (homepage, subreddit) = match source.links {
            Some(links) => (
                links
                    .homepage
                    .and_then(|pages| pages.into_iter().find(|p| !p.trim().is_empty())),
                links.subreddit_url.filter(|s| !s.trim().is_empty()),
            ),
            None => (None, None),
        };

        AssetDetail {
            id: source.id.into(),
            symbol: source.symbol,
            name: source.name,
            block_time_minutes: source.block_time_in_minutes,
            hashing_algorithm: source.hashing_algorithm.filter(|h| !h.trim().is_empty()),
            description: source
                .description
                .and_then(|d| d.en)
                .filter(|d| !d.trim().is_empty()),
            homepage,
            subreddit,
        }
    }
}

/// Convert a markets page, dropping invalid rows and repeated ids.
///
/// The first valid occurrence of an id wins. Dropped rows are logged, never
/// fatal.
pub(crate) fn assets_from_markets(rows: Vec<wire::CoinMarketResponse>) -> Vec<Asset> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut assets = Vec::with_capacity(rows.len());

    for row in rows {
        if seen.contains(&row.id) {
            tracing::warn!(id = %row.id, "Dropping duplicate asset id");
            continue;
        }
        let id = row.id.clone();
        match Asset::try_from(row) {
            Ok(asset) => {
                seen.insert(id);
                assets.push(asset);
            }
            Err(err) => tracing::warn!(id = %id, error = %err, "Dropping invalid asset"),
        }
    }

    assets
}
