//! On-disk format of the holdings file.
//!
//! Quantities are stored as decimal strings so they round-trip exactly.

use super::HoldingRecord;
use serde::{Deserialize, Serialize};

pub const HOLDINGS_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingsFile {
    pub version: u32,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
}

impl HoldingsFile {
    pub fn new(holdings: Vec<HoldingRecord>) -> Self {
        Self {
            version: HOLDINGS_FILE_VERSION,
            holdings,
        }
    }
}
