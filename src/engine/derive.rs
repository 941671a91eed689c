//! Pure derivation functions: filter, sort, merge.
//!
//! No I/O, no clocks, no failure paths. Missing optional fields follow one
//! policy each: a missing `rank` sorts after every ranked item.

use crate::domain::asset::Asset;
use crate::domain::holding::{HoldingRecord, PortfolioAsset};
use crate::domain::query::SortOption;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Anything sortable by rank and price.
pub trait Ranked {
    fn rank(&self) -> Option<u32>;
    fn price(&self) -> Decimal;
}

impl Ranked for Asset {
    fn rank(&self) -> Option<u32> {
        self.rank
    }

    fn price(&self) -> Decimal {
        self.current_price
    }
}

impl Ranked for PortfolioAsset {
    fn rank(&self) -> Option<u32> {
        self.asset.rank
    }

    fn price(&self) -> Decimal {
        self.asset.current_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    RankAscending,
    RankDescending,
    PriceAscending,
    PriceDescending,
}

impl Order {
    fn for_assets(option: SortOption) -> Self {
        match option {
            SortOption::Rank | SortOption::Holdings => Order::RankAscending,
            SortOption::RankDescending | SortOption::HoldingsDescending => Order::RankDescending,
            SortOption::Price => Order::PriceAscending,
            SortOption::PriceDescending => Order::PriceDescending,
        }
    }

    fn for_portfolio(option: SortOption) -> Self {
        match option {
            SortOption::RankDescending | SortOption::HoldingsDescending => Order::RankDescending,
            _ => Order::RankAscending,
        }
    }
}

/// Ranked before unranked; `descending` flips only the ranked part.
fn compare_rank(a: Option<u32>, b: Option<u32>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_by_order<T: Ranked>(items: &mut [T], order: Order) {
    // `sort_by` is stable: equal keys keep input order.
    match order {
        Order::RankAscending => items.sort_by(|a, b| compare_rank(a.rank(), b.rank(), false)),
        Order::RankDescending => items.sort_by(|a, b| compare_rank(a.rank(), b.rank(), true)),
        Order::PriceAscending => items.sort_by(|a, b| a.price().cmp(&b.price())),
        Order::PriceDescending => items.sort_by(|a, b| b.price().cmp(&a.price())),
    }
}

/// Sort the asset list in place.
pub fn sort_assets(assets: &mut [Asset], option: SortOption) {
    sort_by_order(assets, Order::for_assets(option));
}

/// Sort the portfolio list in place.
pub fn sort_portfolio(items: &mut [PortfolioAsset], option: SortOption) {
    sort_by_order(items, Order::for_portfolio(option));
}

/// Lowercased search text. Whitespace is significant.
pub fn normalize_search(text: &str) -> String {
    text.to_lowercase()
}

/// Assets whose name or symbol contains `search_text`, ignoring case, in
/// input order. Empty text keeps everything; a lone space is a real needle.
pub fn filter_assets(assets: &[Asset], search_text: &str) -> Vec<Asset> {
    let needle = normalize_search(search_text);
    if needle.is_empty() {
        return assets.to_vec();
    }
    assets
        .iter()
        .filter(|asset| asset.matches_search(&needle))
        .cloned()
        .collect()
}

/// Filter then sort.
pub fn visible_assets(assets: &[Asset], search_text: &str, option: SortOption) -> Vec<Asset> {
    let mut visible = filter_assets(assets, search_text);
    sort_assets(&mut visible, option);
    visible
}

/// Join holdings with assets by id, in holdings order.
///
/// Records with a non-positive quantity or without a matching asset are
/// skipped; the latter reappear once a fetch contains their id.
pub fn merge_portfolio(assets: &[Asset], holdings: &[HoldingRecord]) -> Vec<PortfolioAsset> {
    let by_id: HashMap<&str, &Asset> = assets.iter().map(|a| (a.id.as_str(), a)).collect();
    holdings
        .iter()
        .filter(|record| record.quantity > Decimal::ZERO)
        .filter_map(|record| {
            by_id
                .get(record.asset_id.as_str())
                .map(|asset| PortfolioAsset::new((*asset).clone(), record.quantity))
        })
        .collect()
}

/// Merge then sort.
pub fn portfolio_assets(
    assets: &[Asset],
    holdings: &[HoldingRecord],
    option: SortOption,
) -> Vec<PortfolioAsset> {
    let mut portfolio = merge_portfolio(assets, holdings);
    sort_portfolio(&mut portfolio, option);
    portfolio
}
