//! Asset store — latest asset list and latest global stats.
//!
//! Owned by the dashboard runtime. Each setter replaces the held value
//! atomically, notifies subscribers, and returns the `Change` the runtime
//! feeds to the derivation engine.

use super::Asset;
use crate::domain::market_stats::GlobalStats;
use crate::engine::Change;
use crate::shared::Observable;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Default)]
pub struct AssetStore {
    assets: Observable<Arc<Vec<Asset>>>,
    stats: Observable<Option<Arc<GlobalStats>>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole asset list.
    #[must_use = "the returned change must be handed to the engine"]
    pub fn set_assets(&self, assets: Vec<Asset>) -> Change {
        tracing::debug!(count = assets.len(), "Asset list replaced");
        self.assets.replace(Arc::new(assets));
        Change::Assets
    }

    /// Replace the global stats.
    #[must_use = "the returned change must be handed to the engine"]
    pub fn set_stats(&self, stats: GlobalStats) -> Change {
        tracing::debug!("Global stats replaced");
        self.stats.replace(Some(Arc::new(stats)));
        Change::GlobalStats
    }

    pub fn assets(&self) -> Arc<Vec<Asset>> {
        self.assets.get()
    }

    /// `None` until the first successful stats fetch.
    pub fn stats(&self) -> Option<Arc<GlobalStats>> {
        self.stats.get()
    }

    pub fn subscribe_assets(&self) -> watch::Receiver<Arc<Vec<Asset>>> {
        self.assets.subscribe()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Option<Arc<GlobalStats>>> {
        self.stats.subscribe()
    }
}
