//! Conversion: GlobalResponse → GlobalStats (TryFrom + validation).

use super::wire::{GlobalDataResponse, GlobalResponse};
use super::{GlobalStats, ValidationError};
use rust_decimal::prelude::*;
use std::collections::HashMap;

/// Convert a currency-keyed map, lowercasing keys. Every value must be finite
/// and non-negative.
fn convert_map(
    field: &str,
    source: HashMap<String, f64>,
    errors: &mut Vec<ValidationError>,
) -> HashMap<String, Decimal> {
    let mut out = HashMap::with_capacity(source.len());
    for (key, value) in source {
        let label = format!("{}.{}", field, key);
        match Decimal::from_f64(value).filter(|_| value.is_finite()) {
            Some(d) if d.is_sign_negative() && !d.is_zero() => {
                errors.push(ValidationError::NegativeValue(label))
            }
            Some(d) => {
                out.insert(key.to_lowercase(), d);
            }
            None => errors.push(ValidationError::NonFiniteValue(label)),
        }
    }
    out
}

impl TryFrom<GlobalDataResponse> for GlobalStats {
    type Error = ValidationError;

    fn try_from(source: GlobalDataResponse) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let total_market_cap = convert_map("total_market_cap", source.total_market_cap, &mut errors);
        let total_volume = convert_map("total_volume", source.total_volume, &mut errors);
        let market_cap_share =
            convert_map("market_cap_percentage", source.market_cap_percentage, &mut errors);

        let market_cap_change_percent_24h = match source.market_cap_change_percentage_24h_usd {
            Some(v) => match Decimal::from_f64(v).filter(|_| v.is_finite()) {
                Some(d) => Some(d),
                None => {
                    errors.push(ValidationError::NonFiniteValue(
                        "market_cap_change_percentage_24h_usd".to_string(),
                    ));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(ValidationError::Multiple(errors));
        }

        Ok(GlobalStats {
            total_market_cap,
            total_volume,
            market_cap_share,
            market_cap_change_percent_24h,
            active_assets: source.active_cryptocurrencies,
            markets: source.markets,
            updated_at: source.updated_at,
        })
    }
}

impl TryFrom<GlobalResponse> for GlobalStats {
    type Error = ValidationError;

    fn try_from(source: GlobalResponse) -> Result<Self, Self::Error> {
        GlobalStats::try_from(source.data)
    }
}
