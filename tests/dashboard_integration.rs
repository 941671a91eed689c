//! Integration tests for the dashboard runtime.
//!
//! A fake market-data source and in-memory (or temp-file) holdings drive the
//! full queue: fetch → stores → engine → subscriptions. Time is paused, so
//! debounce timing is exact.
//!
//! Run with:
//! ```bash
//! cargo test --test dashboard_integration
//! ```

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use coinboard::domain::holding::HoldingWrite;
use coinboard::prelude::*;
use coinboard::shared::observable::changes;

const WAIT: Duration = Duration::from_secs(10);

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn btc() -> Asset {
    Asset::new("bitcoin", "btc", "Bitcoin", Some(1), dec("50000"))
}

fn eth() -> Asset {
    Asset::new("ethereum", "eth", "Ethereum", Some(2), dec("3000"))
}

fn sol() -> Asset {
    Asset::new("solana", "sol", "Solana", Some(5), dec("150"))
}

fn global_stats() -> GlobalStats {
    let mut stats = GlobalStats::default();
    stats
        .total_market_cap
        .insert("usd".to_string(), dec("2400000000000"));
    stats.total_volume.insert("usd".to_string(), dec("85000000000"));
    stats.market_cap_share.insert("btc".to_string(), dec("52.4"));
    stats.market_cap_change_percent_24h = Some(dec("1.5"));
    stats
}

// ─── Fakes ───────────────────────────────────────────────────────────────────

struct FakeSource {
    assets: Mutex<Vec<Asset>>,
    stats: Mutex<GlobalStats>,
    fail: AtomicBool,
    delay: Duration,
}

impl FakeSource {
    fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: Mutex::new(assets),
            stats: Mutex::new(global_stats()),
            fail: AtomicBool::new(false),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn set_assets(&self, assets: Vec<Asset>) {
        *self.assets.lock().unwrap() = assets;
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn fetch_assets(&self) -> Result<Vec<Asset>, FetchError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Other("network unreachable".into()));
        }
        let assets = self.assets.lock().unwrap().clone();
        Ok(assets)
    }

    async fn fetch_global_stats(&self) -> Result<GlobalStats, FetchError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Other("network unreachable".into()));
        }
        let stats = self.stats.lock().unwrap().clone();
        Ok(stats)
    }
}

/// In-memory holdings whose saves can be switched to fail.
#[derive(Default)]
struct FlakyHoldings {
    inner: InMemoryHoldings,
    fail_saves: AtomicBool,
}

#[async_trait]
impl HoldingsPersistence for FlakyHoldings {
    async fn load_holdings(&self) -> Result<Vec<HoldingRecord>, PersistenceError> {
        self.inner.load_holdings().await
    }

    async fn save_holding(&self, write: &HoldingWrite) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("disk full".into()));
        }
        self.inner.save_holding(write).await
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, what: &str, mut pred: F)
where
    F: FnMut(&T) -> bool,
{
    let result = timeout(WAIT, rx.wait_for(|v| pred(v))).await;
    assert!(
        matches!(result, Ok(Ok(_))),
        "timed out waiting for {what}"
    );
}

/// Let spawned tasks drain without moving the clock.
async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

fn visible_ids(dashboard: &Dashboard) -> Vec<String> {
    dashboard
        .visible_assets()
        .borrow()
        .iter()
        .map(|a| a.id.to_string())
        .collect()
}

fn portfolio_entries(dashboard: &Dashboard) -> Vec<(String, Decimal, Decimal)> {
    dashboard
        .portfolio_assets()
        .borrow()
        .iter()
        .map(|p| (p.asset.id.to_string(), p.quantity, p.holdings_value))
        .collect()
}

fn spawn(source: Arc<FakeSource>, holdings: Arc<dyn HoldingsPersistence>) -> Dashboard {
    Dashboard::spawn(source, holdings, DashboardConfig::default())
}

async fn loaded_dashboard(holdings: Arc<dyn HoldingsPersistence>) -> Dashboard {
    let dashboard = spawn(Arc::new(FakeSource::new(vec![btc(), eth()])), holdings);
    let mut visible = dashboard.visible_assets();
    wait_until(&mut visible, "initial assets", |v| v.len() == 2).await;
    let mut summary = dashboard.summary_stats();
    wait_until(&mut summary, "initial summary", |s| s.len() == 4).await;
    dashboard
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initial_refresh_populates_views() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;

    // default sort is holdings, which orders the list by rank
    assert_eq!(visible_ids(&dashboard), ["bitcoin", "ethereum"]);
    assert!(dashboard.portfolio_assets().borrow().is_empty());

    let summary = dashboard.summary_stats().borrow().clone();
    let titles: Vec<_> = summary.iter().map(|s| s.title.clone()).collect();
    assert_eq!(
        titles,
        ["Total Market Cap", "Total Market Volume", "BTC Dominance", "Portfolio"]
    );
    assert_eq!(summary[0].value, "$2.40T");
    assert_eq!(summary[2].value, "52.40%");
    assert_eq!(summary[3].value, "$0.00");
    assert!(!*dashboard.is_loading().borrow());
    assert!(dashboard.last_error().borrow().is_none());
}

#[tokio::test(start_paused = true)]
async fn holding_appears_in_portfolio_and_summary() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;

    dashboard.set_holding("ethereum", dec("2")).unwrap();

    let mut portfolio = dashboard.portfolio_assets();
    wait_until(&mut portfolio, "eth holding", |p| p.len() == 1).await;
    assert_eq!(
        portfolio_entries(&dashboard),
        [("ethereum".to_string(), dec("2"), dec("6000"))]
    );

    let mut summary = dashboard.summary_stats();
    wait_until(&mut summary, "portfolio figure", |s| {
        s.get(3).map(|s| s.value.as_str()) == Some("$6,000.00")
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn search_is_case_insensitive() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;

    dashboard.set_search_text("ETH").unwrap();
    let mut visible = dashboard.visible_assets();
    wait_until(&mut visible, "filtered list", |v| v.len() == 1).await;
    assert_eq!(visible_ids(&dashboard), ["ethereum"]);

    dashboard.set_search_text("").unwrap();
    wait_until(&mut visible, "full list", |v| v.len() == 2).await;
}

#[tokio::test(start_paused = true)]
async fn search_changes_within_window_recompute_once() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;
    settle().await;

    let counts = dashboard.recompute_counts();
    let before = counts.borrow().visible;

    // t = 0, 100, 200
    dashboard.set_search_text("b").unwrap();
    sleep(Duration::from_millis(100)).await;
    dashboard.set_search_text("bit").unwrap();
    sleep(Duration::from_millis(100)).await;
    dashboard.set_search_text("eth").unwrap();

    // t = 699
    sleep(Duration::from_millis(499)).await;
    settle().await;
    assert_eq!(counts.borrow().visible, before);
    assert_eq!(visible_ids(&dashboard), ["bitcoin", "ethereum"]);

    // t = 701
    sleep(Duration::from_millis(2)).await;
    settle().await;
    assert_eq!(counts.borrow().visible, before + 1);
    assert_eq!(visible_ids(&dashboard), ["ethereum"]);

    sleep(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(counts.borrow().visible, before + 1);
}

#[tokio::test(start_paused = true)]
async fn sort_change_applies_immediately() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;
    settle().await;

    dashboard.set_sort_option(SortOption::Price).unwrap();
    settle().await;
    assert_eq!(visible_ids(&dashboard), ["ethereum", "bitcoin"]);
    assert_eq!(*dashboard.sort_option().borrow(), SortOption::Price);

    dashboard.set_sort_option(SortOption::RankDescending).unwrap();
    settle().await;
    assert_eq!(visible_ids(&dashboard), ["ethereum", "bitcoin"]);

    dashboard.set_sort_option(SortOption::PriceDescending).unwrap();
    settle().await;
    assert_eq!(visible_ids(&dashboard), ["bitcoin", "ethereum"]);
}

#[tokio::test(start_paused = true)]
async fn zero_quantity_removes_holding() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;
    let mut portfolio = dashboard.portfolio_assets();

    dashboard.set_holding("bitcoin", dec("1")).unwrap();
    wait_until(&mut portfolio, "btc holding", |p| p.len() == 1).await;

    dashboard.set_holding("bitcoin", Decimal::ZERO).unwrap();
    wait_until(&mut portfolio, "btc removed", |p| p.is_empty()).await;
}

#[tokio::test(start_paused = true)]
async fn oversized_holding_keeps_runtime_alive() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;
    let mut portfolio = dashboard.portfolio_assets();

    // 1e25 × 50,000 does not fit in a Decimal
    dashboard
        .set_holding("bitcoin", dec("10000000000000000000000000"))
        .unwrap();
    wait_until(&mut portfolio, "btc holding", |p| p.len() == 1).await;
    assert_eq!(portfolio.borrow()[0].holdings_value, Decimal::MAX);

    let mut summary = dashboard.summary_stats();
    wait_until(&mut summary, "saturated portfolio figure", |s| {
        s.get(3)
            .is_some_and(|s| s.value.starts_with("$79,228,162,514,264"))
    })
    .await;

    // the runtime still answers
    dashboard.set_search_text("eth").unwrap();
    let mut visible = dashboard.visible_assets();
    wait_until(&mut visible, "filtered list", |v| v.len() == 1).await;
    dashboard.refresh().unwrap();
    dashboard.set_holding("ethereum", dec("1")).unwrap();
    wait_until(&mut portfolio, "second holding", |p| p.len() == 2).await;
}

#[tokio::test(start_paused = true)]
async fn failed_save_keeps_holdings_and_reports_error() {
    let holdings = Arc::new(FlakyHoldings::default());
    let dashboard = loaded_dashboard(holdings.clone()).await;
    let mut portfolio = dashboard.portfolio_assets();

    dashboard.set_holding("ethereum", dec("1")).unwrap();
    wait_until(&mut portfolio, "eth holding", |p| p.len() == 1).await;

    holdings.fail_saves.store(true, Ordering::SeqCst);
    dashboard.set_holding("ethereum", dec("5")).unwrap();

    let mut last_error = dashboard.last_error();
    wait_until(&mut last_error, "save error", |e| e.is_some()).await;
    let message = last_error.borrow().clone().unwrap();
    assert!(message.contains("disk full"), "unexpected error: {message}");

    assert_eq!(
        portfolio_entries(&dashboard),
        [("ethereum".to_string(), dec("1"), dec("3000"))]
    );
}

#[tokio::test(start_paused = true)]
async fn unmatched_holding_reappears_after_fetch() {
    let source = Arc::new(FakeSource::new(vec![btc(), eth()]));
    let holdings = Arc::new(InMemoryHoldings::with_records(vec![HoldingRecord::new(
        "solana",
        dec("10"),
    )]));
    let dashboard = spawn(source.clone(), holdings);

    let mut visible = dashboard.visible_assets();
    wait_until(&mut visible, "initial assets", |v| v.len() == 2).await;
    settle().await;
    assert!(dashboard.portfolio_assets().borrow().is_empty());

    source.set_assets(vec![btc(), eth(), sol()]);
    dashboard.refresh().unwrap();

    let mut portfolio = dashboard.portfolio_assets();
    wait_until(&mut portfolio, "solana holding", |p| p.len() == 1).await;
    assert_eq!(
        portfolio_entries(&dashboard),
        [("solana".to_string(), dec("10"), dec("1500"))]
    );
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_sets_error_and_refresh_clears_it() {
    let source = Arc::new(FakeSource::new(vec![btc(), eth()]));
    source.set_failing(true);
    let dashboard = spawn(source.clone(), Arc::new(InMemoryHoldings::new()));

    let mut last_error = dashboard.last_error();
    wait_until(&mut last_error, "fetch error", |e| e.is_some()).await;
    assert!(last_error
        .borrow()
        .as_deref()
        .unwrap()
        .contains("network unreachable"));
    // summary stays empty until stats arrive
    assert!(dashboard.summary_stats().borrow().is_empty());

    let mut is_loading = dashboard.is_loading();
    wait_until(&mut is_loading, "loading cleared", |l| !*l).await;

    source.set_failing(false);
    dashboard.refresh().unwrap();
    settle().await;
    let mut visible = dashboard.visible_assets();
    wait_until(&mut visible, "assets after retry", |v| v.len() == 2).await;
    assert!(dashboard.last_error().borrow().is_none());
}

#[tokio::test(start_paused = true)]
async fn loading_flag_covers_both_fetches() {
    let source = Arc::new(FakeSource::new(vec![btc(), eth()]).with_delay(Duration::from_secs(1)));
    let dashboard = spawn(source, Arc::new(InMemoryHoldings::new()));

    let mut is_loading = dashboard.is_loading();
    wait_until(&mut is_loading, "loading started", |l| *l).await;
    assert!(dashboard.visible_assets().borrow().is_empty());

    wait_until(&mut is_loading, "loading finished", |l| !*l).await;
    assert_eq!(visible_ids(&dashboard), ["bitcoin", "ethereum"]);
    assert_eq!(dashboard.summary_stats().borrow().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn summary_stream_yields_updates() {
    let dashboard = loaded_dashboard(Arc::new(InMemoryHoldings::new())).await;
    let stream = changes(dashboard.summary_stats());
    tokio::pin!(stream);

    let first = timeout(WAIT, stream.next()).await.unwrap().unwrap();
    assert_eq!(first[3].value, "$0.00");

    dashboard.set_holding("bitcoin", dec("0.5")).unwrap();
    let next = timeout(WAIT, stream.next()).await.unwrap().unwrap();
    assert_eq!(next[3].value, "$25,000.00");
}

#[tokio::test]
async fn holdings_survive_restart_with_file_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("holdings.json");

    let dashboard = loaded_dashboard(Arc::new(JsonFileHoldings::new(&path))).await;
    dashboard.set_holding("ethereum", dec("2.5")).unwrap();
    let mut portfolio = dashboard.portfolio_assets();
    wait_until(&mut portfolio, "eth holding", |p| p.len() == 1).await;
    dashboard.shutdown().await;

    let reopened = loaded_dashboard(Arc::new(JsonFileHoldings::new(&path))).await;
    let mut portfolio = reopened.portfolio_assets();
    wait_until(&mut portfolio, "restored holding", |p| p.len() == 1).await;
    assert_eq!(
        portfolio_entries(&reopened),
        [("ethereum".to_string(), dec("2.5"), dec("7500"))]
    );
}

#[tokio::test]
async fn shutdown_stops_runtime() {
    let dashboard = spawn(
        Arc::new(FakeSource::new(vec![btc()])),
        Arc::new(InMemoryHoldings::new()),
    );
    let handle_rx = dashboard.visible_assets();
    dashboard.shutdown().await;
    // the runtime dropped its stores
    assert!(handle_rx.has_changed().is_err());
}
