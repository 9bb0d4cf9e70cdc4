//! LiqTrack Settlement Core
//!
//! Lifecycle engine for equity settlement instructions: admission policy,
//! fee calculation, the settlement state machine, and an in-memory registry.
//!
//! # Architecture
//!
//! - **Admission first**: every request passes the amount limit and
//!   prohibited-ticker checks before any fee is computed
//! - **Fees at creation**: itemized fees and the net amount are computed
//!   once, at creation, and never recomputed
//! - **Append-only history**: every status change appends an immutable
//!   history event; records are never deleted
//! - **Linear state machine**: `Initiated -> SentToCreate -> Created ->
//!   SentToPay -> Paid`, with `NotAccepted` as the rejection terminal
//!
//! # Invariants
//!
//! - `net_amount + Σfees == gross_amount` for every admitted record
//! - `status` always equals the last history entry's status
//! - Terminal records (`Paid`, `NotAccepted`) reject every transition

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod admission;
pub mod config;
pub mod engine;
pub mod error;
pub mod fees;
pub mod record;
pub mod registry;
pub mod types;

// Re-exports
pub use config::{AdminSettings, CustomFee, SettingsPatch};
pub use engine::{NewSettlement, SettlementEngine};
pub use error::{Error, Result};
pub use fees::{FeeBreakdown, FeeSchedule};
pub use record::SettlementRecord;
pub use registry::SettlementRegistry;
pub use types::{
    BlockedReason, FeeLine, HistoryEntry, SettlementId, SettlementStatus, Ticker,
};
