//! Holdings persistence — the collaborator the portfolio reads from and writes to.
//!
//! Two implementations ship with the crate: `InMemoryHoldings` for tests and
//! ephemeral sessions, and `JsonFileHoldings` for a single JSON file on disk.

use super::wire::{HoldingsFile, HOLDINGS_FILE_VERSION};
use super::{HoldingRecord, HoldingWrite};
use crate::error::PersistenceError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Storage for holdings records.
///
/// A successful `save_holding` must be visible to the next `load_holdings`.
#[async_trait]
pub trait HoldingsPersistence: Send + Sync {
    async fn load_holdings(&self) -> Result<Vec<HoldingRecord>, PersistenceError>;

    async fn save_holding(&self, write: &HoldingWrite) -> Result<(), PersistenceError>;
}

// ─── In-memory ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryHoldings {
    records: Mutex<Vec<HoldingRecord>>,
}

impl InMemoryHoldings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with `records`. Non-positive quantities are dropped.
    pub fn with_records(records: Vec<HoldingRecord>) -> Self {
        Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .filter(|r| r.quantity > Decimal::ZERO)
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl HoldingsPersistence for InMemoryHoldings {
    async fn load_holdings(&self) -> Result<Vec<HoldingRecord>, PersistenceError> {
        Ok(self.records.lock().await.clone())
    }

    async fn save_holding(&self, write: &HoldingWrite) -> Result<(), PersistenceError> {
        write.apply_to(&mut *self.records.lock().await);
        Ok(())
    }
}

// ─── JSON file ───────────────────────────────────────────────────────────────

/// Holdings stored in one JSON file.
///
/// A missing file reads as an empty portfolio. Writes go to a sibling temp
/// file that is then renamed over the target, so readers never observe a
/// half-written file. Writes through one instance are serialized.
#[derive(Debug)]
pub struct JsonFileHoldings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileHoldings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "holdings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_file(&self) -> Result<Vec<HoldingRecord>, PersistenceError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let file: HoldingsFile = serde_json::from_str(&text)?;
        if file.version != HOLDINGS_FILE_VERSION {
            return Err(PersistenceError::Corrupt(format!(
                "Unsupported holdings file version {}",
                file.version
            )));
        }

        let mut records: Vec<HoldingRecord> = Vec::with_capacity(file.holdings.len());
        for record in file.holdings {
            if record.quantity <= Decimal::ZERO {
                tracing::warn!(
                    asset_id = %record.asset_id,
                    quantity = %record.quantity,
                    "Skipping non-positive holding"
                );
                continue;
            }
            if records.iter().any(|r| r.asset_id == record.asset_id) {
                return Err(PersistenceError::Corrupt(format!(
                    "Duplicate holding for {}",
                    record.asset_id
                )));
            }
            records.push(record);
        }
        Ok(records)
    }

    async fn write_file(&self, records: Vec<HoldingRecord>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&HoldingsFile::new(records))?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl HoldingsPersistence for JsonFileHoldings {
    async fn load_holdings(&self) -> Result<Vec<HoldingRecord>, PersistenceError> {
        self.read_file().await
    }

    async fn save_holding(&self, write: &HoldingWrite) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_file().await?;
        write.apply_to(&mut records);
        self.write_file(records).await?;
        tracing::debug!(
            asset_id = %write.asset_id(),
            path = %self.path.display(),
            "Holding saved"
        );
        Ok(())
    }
}
