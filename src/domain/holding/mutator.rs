//! Portfolio mutator — routes "set holding" requests through persistence.

use super::persistence::HoldingsPersistence;
use super::{HoldingRecord, HoldingWrite};
use crate::error::PersistenceError;
use crate::shared::AssetId;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Writes a holding, waits for the acknowledgement, then rereads the full
/// list. The caller pushes the reread into `HoldingsStore`; nothing is
/// applied optimistically.
#[derive(Clone)]
pub struct PortfolioMutator {
    persistence: Arc<dyn HoldingsPersistence>,
}

impl PortfolioMutator {
    pub fn new(persistence: Arc<dyn HoldingsPersistence>) -> Self {
        Self { persistence }
    }

    /// Initial read.
    pub async fn load(&self) -> Result<Vec<HoldingRecord>, PersistenceError> {
        self.persistence.load_holdings().await
    }

    /// `quantity > 0` upserts, anything else removes. Returns the reread list.
    pub async fn set_holding(
        &self,
        asset_id: AssetId,
        quantity: Decimal,
    ) -> Result<Vec<HoldingRecord>, PersistenceError> {
        let write = HoldingWrite::from_quantity(asset_id, quantity);
        tracing::info!(asset_id = %write.asset_id(), %quantity, "Saving holding");
        self.persistence.save_holding(&write).await?;
        self.persistence.load_holdings().await
    }
}

impl std::fmt::Debug for PortfolioMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioMutator").finish_non_exhaustive()
    }
}
