//! Settlement record and its state machine
//!
//! A record is created once (accepted or rejected) and thereafter only
//! status-transitioned, each transition appending an immutable history
//! event. Fees and net amount are fixed at creation and never recomputed.

use crate::fees::FeeBreakdown;
use crate::types::{
    BlockedReason, FeeLine, HistoryEntry, SettlementId, SettlementStatus, Ticker,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An equity settlement instruction tracked from creation through payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Unique identifier, `LIQ-<year>-<sequence>` format
    pub id: SettlementId,

    /// Stock symbol (uppercase, immutable)
    pub ticker: Ticker,

    /// Number of shares (positive)
    pub shares: u64,

    /// Pre-fee transaction value
    pub gross_amount: Decimal,

    /// Itemized fees; empty only when `NotAccepted`
    pub fees: Vec<FeeLine>,

    /// `gross_amount - Σfees`; zero when `NotAccepted`
    pub net_amount: Decimal,

    /// Originating broker
    pub broker_name: String,

    /// Trade date
    pub date: NaiveDate,

    /// Scheduled payment date (set at creation, may be in the past)
    pub payment_date: NaiveDate,

    /// Current status; always equals the last history entry's status
    pub status: SettlementStatus,

    /// Append-only ordered history; first entry is always `Initiated`
    pub history: Vec<HistoryEntry>,
}

impl SettlementRecord {
    /// Create an admitted record in the `Initiated` state
    #[allow(clippy::too_many_arguments)]
    pub fn new_accepted(
        id: SettlementId,
        ticker: Ticker,
        shares: u64,
        gross_amount: Decimal,
        breakdown: FeeBreakdown,
        broker_name: String,
        date: NaiveDate,
        payment_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ticker,
            shares,
            gross_amount,
            fees: breakdown.fees,
            net_amount: breakdown.net_amount,
            broker_name,
            date,
            payment_date,
            status: SettlementStatus::Initiated,
            history: vec![HistoryEntry::new(
                SettlementStatus::Initiated,
                now,
                SettlementStatus::Initiated.transition_description(),
            )],
        }
    }

    /// Create a rejected record, persisted directly in terminal
    /// `NotAccepted` with zero fees and zero net amount
    ///
    /// The history carries exactly two entries: `Initiated`, then
    /// `NotAccepted` tagged with the structured reason.
    #[allow(clippy::too_many_arguments)]
    pub fn new_rejected(
        id: SettlementId,
        ticker: Ticker,
        shares: u64,
        gross_amount: Decimal,
        broker_name: String,
        date: NaiveDate,
        payment_date: NaiveDate,
        reason: BlockedReason,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ticker,
            shares,
            gross_amount,
            fees: Vec::new(),
            net_amount: Decimal::ZERO,
            broker_name,
            date,
            payment_date,
            status: SettlementStatus::NotAccepted,
            history: vec![
                HistoryEntry::new(
                    SettlementStatus::Initiated,
                    now,
                    SettlementStatus::Initiated.transition_description(),
                ),
                HistoryEntry::new(SettlementStatus::NotAccepted, now, description)
                    .with_reason(reason),
            ],
        }
    }

    /// Advance the record exactly one step along the legal path
    ///
    /// Atomic: validates the current status, then sets the new status and
    /// appends the history entry. On error the record is unchanged.
    pub fn transition(&mut self, target: SettlementStatus, now: DateTime<Utc>) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::TerminalState {
                id: self.id.to_string(),
                status: self.status,
            });
        }

        if !self.status.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                id: self.id.to_string(),
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.history.push(HistoryEntry::new(
            target,
            now,
            target.transition_description(),
        ));

        Ok(())
    }

    /// Check if the record is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Sum of all fee lines
    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|fee| fee.amount).sum()
    }

    /// Structured rejection reason, if this record was blocked at admission
    pub fn blocked_reason(&self) -> Option<BlockedReason> {
        self.history.last().and_then(|entry| entry.reason)
    }
}
