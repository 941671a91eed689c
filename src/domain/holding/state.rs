//! Holdings store — the last holdings list read from persistence.

use super::HoldingRecord;
use crate::engine::Change;
use crate::shared::Observable;
use std::sync::Arc;
use tokio::sync::watch;

/// Mirrors persistence. Only ever replaced wholesale with the result of a
/// read, never patched.
#[derive(Debug, Default)]
pub struct HoldingsStore {
    records: Observable<Arc<Vec<HoldingRecord>>>,
}

impl HoldingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the returned change must be handed to the engine"]
    pub fn set_all(&self, records: Vec<HoldingRecord>) -> Change {
        tracing::debug!(count = records.len(), "Holdings replaced");
        self.records.replace(Arc::new(records));
        Change::Holdings
    }

    pub fn records(&self) -> Arc<Vec<HoldingRecord>> {
        self.records.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<HoldingRecord>>> {
        self.records.subscribe()
    }
}
