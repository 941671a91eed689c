//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching backend responses or files
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `state.rs` — Observable stores owned by the dashboard runtime
//! - `client.rs` — Sub-client with HTTP methods and caching

pub mod asset;
pub mod holding;
pub mod market_stats;
pub mod query;
