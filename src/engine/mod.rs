//! Derivation engine — turns store changes into derived views.
//!
//! The engine owns no input state. The runtime replaces an input in its store,
//! takes the `Change` the store returns, and calls [`DerivationEngine::handle`]
//! with a fresh [`Inputs`] snapshot. Recomputation is synchronous and cannot
//! fail. The only deferred work is the search debounce, which the runtime
//! drives through [`DerivationEngine::next_deadline`] and
//! [`DerivationEngine::fire_due`].
//!
//! Trigger table:
//!
//! | change          | recompute                                        |
//! |-----------------|--------------------------------------------------|
//! | `Assets`        | visible, portfolio, summary                      |
//! | `SortOption`    | visible, portfolio, summary                      |
//! | `SearchText`    | visible, after the debounce window               |
//! | `Holdings`      | portfolio, summary                               |
//! | `GlobalStats`   | summary                                          |

pub mod debounce;
pub mod derive;
pub mod summary;

pub use debounce::Debounce;

use crate::domain::asset::Asset;
use crate::domain::holding::{HoldingRecord, PortfolioAsset};
use crate::domain::market_stats::{GlobalStats, Statistic};
use crate::domain::query::SortOption;
use crate::shared::Observable;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Default search debounce window.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Which input was just replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Assets,
    GlobalStats,
    Holdings,
    SearchText,
    SortOption,
}

/// Latest value of every input, read after the replacement that triggered
/// the change.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub assets: Arc<Vec<Asset>>,
    pub stats: Option<Arc<GlobalStats>>,
    pub holdings: Arc<Vec<HoldingRecord>>,
    pub search_text: String,
    pub sort_option: SortOption,
}

/// How many times each output has been recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeCounts {
    pub visible: u64,
    pub portfolio: u64,
    pub summary: u64,
}

pub struct DerivationEngine {
    debounce: Debounce,
    visible_assets: Observable<Arc<Vec<Asset>>>,
    portfolio_assets: Observable<Arc<Vec<PortfolioAsset>>>,
    summary_stats: Observable<Arc<Vec<Statistic>>>,
    counts: RecomputeCounts,
}

impl DerivationEngine {
    pub fn new(search_debounce: Duration) -> Self {
        Self {
            debounce: Debounce::new(search_debounce),
            visible_assets: Observable::default(),
            portfolio_assets: Observable::default(),
            summary_stats: Observable::default(),
            counts: RecomputeCounts::default(),
        }
    }

    /// React to one input change.
    pub fn handle(&mut self, change: Change, inputs: &Inputs, now: Instant) {
        match change {
            Change::Assets | Change::SortOption => {
                self.recompute_visible(inputs);
                self.recompute_portfolio(inputs);
                self.recompute_summary(inputs);
            }
            Change::SearchText => self.debounce.schedule(now),
            Change::Holdings => {
                self.recompute_portfolio(inputs);
                self.recompute_summary(inputs);
            }
            Change::GlobalStats => self.recompute_summary(inputs),
        }
    }

    /// When the pending search recompute is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Run the pending search recompute if its deadline has passed.
    pub fn fire_due(&mut self, inputs: &Inputs, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.recompute_visible(inputs);
            true
        } else {
            false
        }
    }

    pub fn counts(&self) -> RecomputeCounts {
        self.counts
    }

    pub fn visible_assets(&self) -> Arc<Vec<Asset>> {
        self.visible_assets.get()
    }

    pub fn portfolio_assets(&self) -> Arc<Vec<PortfolioAsset>> {
        self.portfolio_assets.get()
    }

    pub fn summary_stats(&self) -> Arc<Vec<Statistic>> {
        self.summary_stats.get()
    }

    pub fn subscribe_visible_assets(&self) -> watch::Receiver<Arc<Vec<Asset>>> {
        self.visible_assets.subscribe()
    }

    pub fn subscribe_portfolio_assets(&self) -> watch::Receiver<Arc<Vec<PortfolioAsset>>> {
        self.portfolio_assets.subscribe()
    }

    pub fn subscribe_summary_stats(&self) -> watch::Receiver<Arc<Vec<Statistic>>> {
        self.summary_stats.subscribe()
    }

    fn recompute_visible(&mut self, inputs: &Inputs) {
        let visible = derive::visible_assets(&inputs.assets, &inputs.search_text, inputs.sort_option);
        tracing::trace!(
            count = visible.len(),
            search = %inputs.search_text,
            sort = %inputs.sort_option,
            "Recomputed visible assets"
        );
        self.visible_assets.replace(Arc::new(visible));
        self.counts.visible += 1;
    }

    fn recompute_portfolio(&mut self, inputs: &Inputs) {
        let portfolio =
            derive::portfolio_assets(&inputs.assets, &inputs.holdings, inputs.sort_option);
        tracing::trace!(count = portfolio.len(), "Recomputed portfolio assets");
        self.portfolio_assets.replace(Arc::new(portfolio));
        self.counts.portfolio += 1;
    }

    /// Reads the portfolio this engine last derived.
    fn recompute_summary(&mut self, inputs: &Inputs) {
        let portfolio = self.portfolio_assets.get();
        let summary = summary::summarize(inputs.stats.as_deref(), &portfolio);
        tracing::trace!(count = summary.len(), "Recomputed summary stats");
        self.summary_stats.replace(Arc::new(summary));
        self.counts.summary += 1;
    }
}

impl Default for DerivationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl std::fmt::Debug for DerivationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationEngine")
            .field("debounce", &self.debounce)
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}
