//! Dashboard — the runtime that owns every store and the handle the
//! presentation layer talks to.
//!
//! ```rust,ignore
//! use coinboard::prelude::*;
//! use std::sync::Arc;
//!
//! let client = CoinboardClient::builder().build()?;
//! let holdings = JsonFileHoldings::new("holdings.json");
//! let dashboard = Dashboard::spawn(Arc::new(client), Arc::new(holdings), DashboardConfig::default());
//!
//! dashboard.set_search_text("eth")?;
//! let mut visible = dashboard.visible_assets();
//! visible.changed().await?;
//! ```

pub mod config;
pub(crate) mod runtime;
pub mod source;

pub use config::DashboardConfig;
pub use source::MarketDataSource;

use crate::domain::asset::Asset;
use crate::domain::holding::mutator::PortfolioMutator;
use crate::domain::holding::persistence::HoldingsPersistence;
use crate::domain::holding::PortfolioAsset;
use crate::domain::market_stats::Statistic;
use crate::domain::query::SortOption;
use crate::engine::RecomputeCounts;
use crate::error::CoinboardError;
use crate::shared::AssetId;
use runtime::{Message, Runtime};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Handle to a running dashboard.
///
/// Entry points enqueue a message and return immediately; results show up on
/// the subscriptions. Dropping the handle stops the runtime.
pub struct Dashboard {
    queue: mpsc::UnboundedSender<Message>,
    visible_assets: watch::Receiver<Arc<Vec<Asset>>>,
    portfolio_assets: watch::Receiver<Arc<Vec<PortfolioAsset>>>,
    summary_stats: watch::Receiver<Arc<Vec<Statistic>>>,
    search_text: watch::Receiver<String>,
    sort_option: watch::Receiver<SortOption>,
    is_loading: watch::Receiver<bool>,
    last_error: watch::Receiver<Option<String>>,
    recompute_counts: watch::Receiver<RecomputeCounts>,
    task_handle: Option<JoinHandle<()>>,
}

impl Dashboard {
    /// Start the runtime on the current tokio runtime.
    ///
    /// Holdings are read immediately. With `refresh_on_start`, a refresh is
    /// queued right after.
    pub fn spawn(
        source: Arc<dyn MarketDataSource>,
        persistence: Arc<dyn HoldingsPersistence>,
        config: DashboardConfig,
    ) -> Self {
        let (queue, queue_rx) = mpsc::unbounded_channel();
        let runtime = Runtime::new(
            source,
            PortfolioMutator::new(persistence),
            config.search_debounce,
            queue.clone(),
        );

        let mut dashboard = Self {
            queue: queue.clone(),
            visible_assets: runtime.engine.subscribe_visible_assets(),
            portfolio_assets: runtime.engine.subscribe_portfolio_assets(),
            summary_stats: runtime.engine.subscribe_summary_stats(),
            search_text: runtime.query.subscribe_search_text(),
            sort_option: runtime.query.subscribe_sort_option(),
            is_loading: runtime.status.is_loading.subscribe(),
            last_error: runtime.status.last_error.subscribe(),
            recompute_counts: runtime.status.counts.subscribe(),
            task_handle: None,
        };

        runtime.load_holdings();
        if config.refresh_on_start {
            let _ = queue.send(Message::Refresh);
        }

        tracing::info!(
            debounce_ms = config.search_debounce.as_millis() as u64,
            "Dashboard started"
        );
        dashboard.task_handle = Some(tokio::spawn(runtime::run(runtime, queue_rx)));
        dashboard
    }

    // ── Entry points ─────────────────────────────────────────────────────

    /// Refetch assets and global stats. Clears the last error.
    pub fn refresh(&self) -> Result<(), CoinboardError> {
        self.send(Message::Refresh)
    }

    pub fn set_search_text(&self, text: impl Into<String>) -> Result<(), CoinboardError> {
        self.send(Message::SetSearchText(text.into()))
    }

    pub fn set_sort_option(&self, option: SortOption) -> Result<(), CoinboardError> {
        self.send(Message::SetSortOption(option))
    }

    /// Persist a holding. `quantity <= 0` removes it. The portfolio updates
    /// once persistence acknowledges and the holdings are reread.
    pub fn set_holding(
        &self,
        asset_id: impl Into<AssetId>,
        quantity: Decimal,
    ) -> Result<(), CoinboardError> {
        self.send(Message::SetHolding {
            asset_id: asset_id.into(),
            quantity,
        })
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    pub fn visible_assets(&self) -> watch::Receiver<Arc<Vec<Asset>>> {
        self.visible_assets.clone()
    }

    pub fn portfolio_assets(&self) -> watch::Receiver<Arc<Vec<PortfolioAsset>>> {
        self.portfolio_assets.clone()
    }

    /// Empty until global stats have been fetched once.
    pub fn summary_stats(&self) -> watch::Receiver<Arc<Vec<Statistic>>> {
        self.summary_stats.clone()
    }

    pub fn search_text(&self) -> watch::Receiver<String> {
        self.search_text.clone()
    }

    pub fn sort_option(&self) -> watch::Receiver<SortOption> {
        self.sort_option.clone()
    }

    /// `true` while a fetch started by `refresh` is outstanding.
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.is_loading.clone()
    }

    /// Message of the most recent fetch or persistence failure.
    pub fn last_error(&self) -> watch::Receiver<Option<String>> {
        self.last_error.clone()
    }

    /// Running totals of engine recomputations.
    pub fn recompute_counts(&self) -> watch::Receiver<RecomputeCounts> {
        self.recompute_counts.clone()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Stop the runtime and wait for it to exit.
    pub async fn shutdown(mut self) {
        let _ = self.queue.send(Message::Shutdown);
        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }

    fn send(&self, message: Message) -> Result<(), CoinboardError> {
        self.queue.send(message).map_err(|_| CoinboardError::Closed)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}
