//! Holding domain — persisted quantities and the derived portfolio view.

pub mod mutator;
pub mod persistence;
pub mod state;
pub mod wire;

use crate::domain::asset::Asset;
use crate::shared::AssetId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── HoldingRecord ───────────────────────────────────────────────────────────

/// How much of one asset the user holds.
///
/// Only records with `quantity > 0` are ever written; the mutator enforces
/// this, the store does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub asset_id: AssetId,
    pub quantity: Decimal,
}

impl HoldingRecord {
    pub fn new(asset_id: impl Into<AssetId>, quantity: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            quantity,
        }
    }
}

// ─── HoldingWrite ────────────────────────────────────────────────────────────

/// One persistence write. Built from a requested quantity: positive upserts,
/// zero or negative removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingWrite {
    Upsert(HoldingRecord),
    Remove(AssetId),
}

impl HoldingWrite {
    pub fn from_quantity(asset_id: AssetId, quantity: Decimal) -> Self {
        if quantity > Decimal::ZERO {
            HoldingWrite::Upsert(HoldingRecord { asset_id, quantity })
        } else {
            HoldingWrite::Remove(asset_id)
        }
    }

    pub fn asset_id(&self) -> &AssetId {
        match self {
            HoldingWrite::Upsert(record) => &record.asset_id,
            HoldingWrite::Remove(id) => id,
        }
    }

    /// Apply to an in-memory record list. Upserts keep the position of an
    /// existing record and append new ones.
    pub fn apply_to(&self, records: &mut Vec<HoldingRecord>) {
        match self {
            HoldingWrite::Upsert(record) => {
                match records.iter_mut().find(|r| r.asset_id == record.asset_id) {
                    Some(existing) => existing.quantity = record.quantity,
                    None => records.push(record.clone()),
                }
            }
            HoldingWrite::Remove(id) => records.retain(|r| &r.asset_id != id),
        }
    }
}

// ─── PortfolioAsset ──────────────────────────────────────────────────────────

/// An asset joined with the user's holding. Derived on every recompute, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub asset: Asset,
    pub quantity: Decimal,
    /// `quantity × current_price`, exact. Saturates at `Decimal::MAX` when the
    /// product is not representable.
    pub holdings_value: Decimal,
}

impl PortfolioAsset {
    pub fn new(asset: Asset, quantity: Decimal) -> Self {
        let holdings_value = match quantity.checked_mul(asset.current_price) {
            Some(value) => value,
            None => {
                tracing::warn!(
                    asset_id = %asset.id,
                    %quantity,
                    price = %asset.current_price,
                    "Holdings value overflowed, saturating"
                );
                Decimal::MAX
            }
        };
        Self {
            asset,
            quantity,
            holdings_value,
        }
    }
}
