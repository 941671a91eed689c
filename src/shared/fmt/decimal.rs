//! Decimal formatting utilities for human-readable display.
//!
//! Handles `rust_decimal::Decimal` values: fixed-precision currency strings with
//! thousands separators, abbreviated suffixes (K/M/B/T) and percentages.
//! Rounding is half-to-even throughout.

use super::num::{display_formatted_string, group_thousands};
use rust_decimal::prelude::*;
use std::sync::OnceLock;

static TRILLION: OnceLock<Decimal> = OnceLock::new();
static BILLION: OnceLock<Decimal> = OnceLock::new();
static MILLION: OnceLock<Decimal> = OnceLock::new();
static THOUSAND: OnceLock<Decimal> = OnceLock::new();

fn get_trillion() -> &'static Decimal {
    TRILLION.get_or_init(|| Decimal::from(1_000_000_000_000u64))
}

fn get_billion() -> &'static Decimal {
    BILLION.get_or_init(|| Decimal::from(1_000_000_000u64))
}

fn get_million() -> &'static Decimal {
    MILLION.get_or_init(|| Decimal::from(1_000_000u64))
}

fn get_thousand() -> &'static Decimal {
    THOUSAND.get_or_init(|| Decimal::from(1_000u64))
}

/// Rounds to `digits` places and pads with zeros to exactly `digits` places.
pub fn fixed(value: &Decimal, digits: u32) -> String {
    format!("{:.precision$}", value.round_dp(digits), precision = digits as usize)
}

/// Abbreviated amount with a currency symbol between sign and digits,
/// e.g. `$1.20T`, `-$3.40M`.
pub fn abbr_currency(amount: &Decimal, symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, symbol, abbr_unsigned(&amount.abs(), 2))
}

fn abbr_unsigned(abs_amount: &Decimal, digits: u32) -> String {
    let (scaled, suffix) = if abs_amount >= get_trillion() {
        (abs_amount / get_trillion(), "T")
    } else if abs_amount >= get_billion() {
        (abs_amount / get_billion(), "B")
    } else if abs_amount >= get_million() {
        (abs_amount / get_million(), "M")
    } else if abs_amount >= get_thousand() {
        (abs_amount / get_thousand(), "K")
    } else {
        (*abs_amount, "")
    };
    format!("{}{}", fixed(&scaled, digits), suffix)
}

/// Currency with exactly two decimals and grouping, e.g. `$6,000.00`.
pub fn currency(amount: &Decimal, symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, symbol, group_thousands(&fixed(&amount.abs(), 2)))
}

/// Currency with up to two decimals, trailing zeros dropped, e.g. `$50,000`,
/// `$0.5`.
pub fn currency_compact(amount: &Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{}{}{}",
        sign,
        symbol,
        display_formatted_string(&rounded.abs().to_string())
    )
}

/// Percentage with two decimals; the value is already in percent units
/// (`52.4` → `52.40%`).
pub fn percent(value: &Decimal) -> String {
    format!("{}%", fixed(value, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_abbr_currency_below_thousand() {
        assert_eq!(abbr_currency(&dec("0"), "$"), "$0.00");
        assert_eq!(abbr_currency(&dec("999.999"), "$"), "$1000.00");
        assert_eq!(abbr_currency(&dec("0.125"), "$"), "$0.12");
    }

    #[test]
    fn test_abbr_currency_thresholds() {
        assert_eq!(abbr_currency(&dec("1000"), "$"), "$1.00K");
        assert_eq!(abbr_currency(&dec("1500000"), "$"), "$1.50M");
        assert_eq!(abbr_currency(&dec("2500000000"), "$"), "$2.50B");
        assert_eq!(abbr_currency(&dec("999999999999"), "$"), "$1000.00B");
    }

    #[test]
    fn test_abbr_currency() {
        assert_eq!(abbr_currency(&dec("1200000000000"), "$"), "$1.20T");
        assert_eq!(abbr_currency(&dec("85000000000"), "$"), "$85.00B");
        assert_eq!(abbr_currency(&dec("-3400000"), "$"), "-$3.40M");
        assert_eq!(abbr_currency(&dec("12.5"), "$"), "$12.50");
    }

    #[test]
    fn test_currency_two_decimals() {
        assert_eq!(currency(&dec("6000"), "$"), "$6,000.00");
        assert_eq!(currency(&dec("0"), "$"), "$0.00");
        assert_eq!(currency(&dec("1234567.891"), "$"), "$1,234,567.89");
        assert_eq!(currency(&dec("-42.5"), "$"), "-$42.50");
    }

    #[test]
    fn test_currency_compact() {
        assert_eq!(currency_compact(&dec("50000"), "$"), "$50,000");
        assert_eq!(currency_compact(&dec("3000.50"), "$"), "$3,000.5");
        assert_eq!(currency_compact(&dec("0.123"), "$"), "$0.12");
        assert_eq!(currency_compact(&dec("-120.40"), "$"), "-$120.4");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(&dec("52.4")), "52.40%");
        assert_eq!(percent(&dec("-0.78")), "-0.78%");
        assert_eq!(percent(&dec("3.14159")), "3.14%");
    }
}
