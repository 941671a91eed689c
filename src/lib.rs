//! # coinboard
//!
//! Client-side core of a crypto market dashboard: asset list with search and
//! sort, a locally persisted portfolio merged into that list, and summary
//! figures, all kept consistent as inputs change.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Domain types, observable stores, pure derivation (always available)
//! 2. **Engine** — `DerivationEngine`: trigger table, search debounce, summary
//! 3. **Dashboard** — Single-queue runtime and the handle the presentation layer holds
//! 4. **HTTP API** — `CoinGeckoHttp` with retry policies
//! 5. **High-Level Client** — `CoinboardClient` with sub-clients and caching
//!
//! The engine and dashboard depend only on the `MarketDataSource` and
//! `HoldingsPersistence` traits; layers 4 and 5 are one implementation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinboard::prelude::*;
//! use std::sync::Arc;
//!
//! let client = CoinboardClient::builder().build()?;
//! let dashboard = Dashboard::spawn(
//!     Arc::new(client),
//!     Arc::new(JsonFileHoldings::new("holdings.json")),
//!     DashboardConfig::default(),
//! );
//!
//! dashboard.set_holding("ethereum", Decimal::from(2))?;
//! let summary = dashboard.summary_stats();
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, observables and display formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, stores.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network constants.
pub mod network;

// ── Layer 2: Engine ──────────────────────────────────────────────────────────

/// Derivation engine: filter, sort, merge, summary, debounce.
pub mod engine;

// ── Layer 3: Dashboard ───────────────────────────────────────────────────────

/// Dashboard runtime and handle.
pub mod dashboard;

// ── Layer 4: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `CoinboardClient` — the CoinGecko entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{AssetId, Observable};
    pub use rust_decimal::Decimal;

    // Domain types
    pub use crate::domain::asset::{Asset, AssetDetail};
    pub use crate::domain::holding::persistence::{
        HoldingsPersistence, InMemoryHoldings, JsonFileHoldings,
    };
    pub use crate::domain::holding::{HoldingRecord, PortfolioAsset};
    pub use crate::domain::market_stats::{GlobalStats, Statistic};
    pub use crate::domain::query::SortOption;

    // Engine
    pub use crate::engine::{Change, DerivationEngine, Inputs, RecomputeCounts};

    // Dashboard
    pub use crate::dashboard::{Dashboard, DashboardConfig, MarketDataSource};

    // Errors
    pub use crate::error::{CoinboardError, FetchError, HttpError, PersistenceError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_VS_CURRENCY};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{AssetsClient, CoinboardClient, CoinboardClientBuilder, MarketStatsClient};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
