//! LiqTrack Reporting
//!
//! Read-only aggregation over settlement snapshots: status distribution,
//! financial totals, blocked-reason breakdown, and per-ticker frequency.
//!
//! Every function here is stateless and side-effect-free: it takes a
//! snapshot slice and returns derived values. Calling twice on the same
//! snapshot yields identical results.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod stats;
pub mod tickers;

pub use stats::{
    blocked_breakdown, settlement_stats, status_distribution, BlockedBreakdown,
    ReasonBucket, SettlementStats, StatusSlice,
};
pub use tickers::{ticker_frequency, TickerVolume};
