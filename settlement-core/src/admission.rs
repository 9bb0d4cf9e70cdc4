//! Admission policy
//!
//! The compliance gate deciding whether a proposed settlement may proceed.
//! Pure predicate over its inputs: settings are passed explicitly per call,
//! never read from shared state. Rejection is a normal outcome, not an
//! error; rejected settlements are still registered for audit.

use crate::config::AdminSettings;
use crate::types::{BlockedReason, Ticker};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Settlement may proceed
    Accept,
    /// Settlement is blocked; recorded as `NotAccepted` with this reason
    Reject(BlockedReason),
}

/// Evaluate a proposed settlement against the current admin settings
///
/// Checks run in a fixed order: the amount limit first, then the
/// prohibited-ticker list. When both fail, `AmountExceedsLimit` is
/// reported; downstream aggregation classifies blocked settlements by this
/// first-matching reason.
pub fn evaluate(gross_amount: Decimal, ticker: &Ticker, settings: &AdminSettings) -> Decision {
    if gross_amount > settings.max_settlement_amount {
        return Decision::Reject(BlockedReason::AmountExceedsLimit);
    }

    if settings.prohibited_tickers.contains(ticker) {
        return Decision::Reject(BlockedReason::TickerProhibited);
    }

    Decision::Accept
}
