//! The single event queue.
//!
//! One background task owns every store and the engine. Presentation calls,
//! fetch results and persistence results all arrive as `Message`s on one
//! unbounded channel and are applied in arrival order, so no derived state is
//! ever shared behind a lock. Fetches run on their own tasks; holdings I/O runs
//! on one sequential worker so writes and rereads keep their order.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::source::MarketDataSource;
use crate::domain::asset::state::AssetStore;
use crate::domain::asset::Asset;
use crate::domain::holding::mutator::PortfolioMutator;
use crate::domain::holding::state::HoldingsStore;
use crate::domain::holding::HoldingRecord;
use crate::domain::market_stats::GlobalStats;
use crate::domain::query::state::QueryState;
use crate::domain::query::SortOption;
use crate::engine::{Change, DerivationEngine, Inputs, RecomputeCounts};
use crate::error::{CoinboardError, FetchError, PersistenceError};
use crate::shared::{AssetId, Observable};

// ─── Messages into the queue ─────────────────────────────────────────────────

pub(crate) enum Message {
    Refresh,
    SetSearchText(String),
    SetSortOption(SortOption),
    SetHolding { asset_id: AssetId, quantity: Decimal },
    AssetsFetched(Result<Vec<Asset>, FetchError>),
    StatsFetched(Result<GlobalStats, FetchError>),
    HoldingsLoaded(Result<Vec<HoldingRecord>, PersistenceError>),
    Shutdown,
}

enum PersistenceJob {
    Load,
    Set { asset_id: AssetId, quantity: Decimal },
}

// ─── Outputs the handle subscribes to ────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct Status {
    pub is_loading: Observable<bool>,
    pub last_error: Observable<Option<String>>,
    pub counts: Observable<RecomputeCounts>,
}

// ─── Task state ──────────────────────────────────────────────────────────────

pub(crate) struct Runtime {
    pub assets: AssetStore,
    pub holdings: HoldingsStore,
    pub query: QueryState,
    pub engine: DerivationEngine,
    pub status: Status,
    source: Arc<dyn MarketDataSource>,
    queue: mpsc::UnboundedSender<Message>,
    jobs: mpsc::UnboundedSender<PersistenceJob>,
    in_flight: usize,
}

impl Runtime {
    /// Builds the state and starts the persistence worker. The returned
    /// runtime has not processed anything yet.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        mutator: PortfolioMutator,
        search_debounce: Duration,
        queue: mpsc::UnboundedSender<Message>,
    ) -> Self {
        let (jobs, jobs_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_persistence(mutator, jobs_rx, queue.clone()));

        Self {
            assets: AssetStore::new(),
            holdings: HoldingsStore::new(),
            query: QueryState::new(),
            engine: DerivationEngine::new(search_debounce),
            status: Status::default(),
            source,
            queue,
            jobs,
            in_flight: 0,
        }
    }

    fn inputs(&self) -> Inputs {
        Inputs {
            assets: self.assets.assets(),
            stats: self.assets.stats(),
            holdings: self.holdings.records(),
            search_text: self.query.search_text(),
            sort_option: self.query.sort_option(),
        }
    }

    fn apply(&mut self, change: Change) {
        let inputs = self.inputs();
        self.engine.handle(change, &inputs, Instant::now());
        self.publish_counts();
    }

    fn publish_counts(&self) {
        let counts = self.engine.counts();
        if *self.status.counts.borrow() != counts {
            self.status.counts.replace(counts);
        }
    }

    fn set_error(&self, err: impl Into<CoinboardError>) {
        let message = err.into().to_string();
        tracing::warn!(error = %message, "Dashboard error");
        self.status.last_error.replace(Some(message));
    }

    fn fetch_settled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.status.is_loading.replace(false);
        }
    }

    fn refresh(&mut self) {
        tracing::info!("Refreshing market data");
        self.status.last_error.replace(None);
        self.in_flight += 2;
        self.status.is_loading.replace(true);

        let source = Arc::clone(&self.source);
        let queue = self.queue.clone();
        tokio::spawn(async move {
            let result = source.fetch_assets().await;
            let _ = queue.send(Message::AssetsFetched(result));
        });

        let source = Arc::clone(&self.source);
        let queue = self.queue.clone();
        tokio::spawn(async move {
            let result = source.fetch_global_stats().await;
            let _ = queue.send(Message::StatsFetched(result));
        });
    }

    /// Queue the initial holdings read.
    pub fn load_holdings(&self) {
        let _ = self.jobs.send(PersistenceJob::Load);
    }

    /// Apply one message. Returns `false` on shutdown.
    pub fn on_message(&mut self, message: Message) -> bool {
        match message {
            Message::Refresh => self.refresh(),
            Message::SetSearchText(text) => {
                let change = self.query.set_search_text(text);
                self.apply(change);
            }
            Message::SetSortOption(option) => {
                let change = self.query.set_sort_option(option);
                self.apply(change);
            }
            Message::SetHolding { asset_id, quantity } => {
                let _ = self.jobs.send(PersistenceJob::Set { asset_id, quantity });
            }
            Message::AssetsFetched(result) => {
                match result {
                    Ok(assets) => {
                        let change = self.assets.set_assets(assets);
                        self.apply(change);
                    }
                    Err(err) => self.set_error(err),
                }
                self.fetch_settled();
            }
            Message::StatsFetched(result) => {
                match result {
                    Ok(stats) => {
                        let change = self.assets.set_stats(stats);
                        self.apply(change);
                    }
                    Err(err) => self.set_error(err),
                }
                self.fetch_settled();
            }
            Message::HoldingsLoaded(result) => match result {
                Ok(records) => {
                    let change = self.holdings.set_all(records);
                    self.apply(change);
                }
                // Store keeps the last successful read.
                Err(err) => self.set_error(err),
            },
            Message::Shutdown => return false,
        }
        true
    }

    /// Run the pending search recompute if it is due.
    fn on_deadline(&mut self) {
        let inputs = self.inputs();
        if self.engine.fire_due(&inputs, Instant::now()) {
            self.publish_counts();
        }
    }
}

// ─── Background tasks ────────────────────────────────────────────────────────

pub(crate) async fn run(mut runtime: Runtime, mut queue: mpsc::UnboundedReceiver<Message>) {
    // No deadline pending: park the sleep far away and keep its branch disabled.
    let far_future = Instant::now() + Duration::from_secs(86400 * 365);
    let debounce_sleep = tokio::time::sleep_until(far_future);
    tokio::pin!(debounce_sleep);
    let mut armed: Option<Instant> = None;

    loop {
        let deadline = runtime.engine.next_deadline();
        if deadline != armed {
            debounce_sleep
                .as_mut()
                .reset(deadline.unwrap_or(far_future));
            armed = deadline;
        }

        tokio::select! {
            message = queue.recv() => {
                match message {
                    Some(message) => {
                        if !runtime.on_message(message) {
                            break;
                        }
                    }
                    None => break,
                }
            }

            () = &mut debounce_sleep, if armed.is_some() => {
                runtime.on_deadline();
            }
        }
    }

    tracing::debug!("Dashboard runtime stopped");
}

async fn run_persistence(
    mutator: PortfolioMutator,
    mut jobs: mpsc::UnboundedReceiver<PersistenceJob>,
    queue: mpsc::UnboundedSender<Message>,
) {
    while let Some(job) = jobs.recv().await {
        let result = match job {
            PersistenceJob::Load => mutator.load().await,
            PersistenceJob::Set { asset_id, quantity } => {
                mutator.set_holding(asset_id, quantity).await
            }
        };
        if queue.send(Message::HoldingsLoaded(result)).is_err() {
            break;
        }
    }
}
