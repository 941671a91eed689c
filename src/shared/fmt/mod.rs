//! Display formatting for summary and detail statistics.
//!
//! - `decimal` — currency, percentage and K/M/B/T abbreviation for `Decimal`
//! - `num` — digit grouping on already-formatted number strings

pub mod decimal;
pub mod num;

pub use decimal::{abbr_currency, currency, currency_compact, percent};
