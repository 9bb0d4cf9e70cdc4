//! Dashboard statistics
//!
//! Financial totals follow the volume definition used throughout: amounts
//! are **net** (post-fee), and rejected settlements contribute nothing to
//! any total. Fee income is only recognized once a settlement is `Paid`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settlement_core::{BlockedReason, SettlementRecord, SettlementStatus};

/// Aggregated dashboard statistics, computed in a single pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementStats {
    /// Total number of records, including rejected ones
    pub total: usize,

    /// Records currently in `Initiated`
    pub initiated: usize,

    /// Records in terminal `NotAccepted`
    pub not_accepted: usize,

    /// Records currently in `SentToCreate`
    pub sent_to_create: usize,

    /// Records currently in `Created`
    pub created: usize,

    /// Records currently in `SentToPay`
    pub sent_to_pay: usize,

    /// Records in terminal `Paid`
    pub paid: usize,

    /// Net volume across all admitted records (everything but `NotAccepted`)
    pub total_amount: Decimal,

    /// Net volume across `Paid` records
    pub total_paid: Decimal,

    /// Fee income across `Paid` records
    pub total_fees_received: Decimal,

    /// Rejections caused by the amount limit
    pub blocked_by_limit: usize,

    /// Rejections caused by the prohibited-ticker list
    pub blocked_by_ticker: usize,
}

/// Compute dashboard statistics over a snapshot
pub fn settlement_stats(records: &[SettlementRecord]) -> SettlementStats {
    let mut stats = SettlementStats {
        total: records.len(),
        initiated: 0,
        not_accepted: 0,
        sent_to_create: 0,
        created: 0,
        sent_to_pay: 0,
        paid: 0,
        total_amount: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        total_fees_received: Decimal::ZERO,
        blocked_by_limit: 0,
        blocked_by_ticker: 0,
    };

    for record in records {
        match record.status {
            SettlementStatus::Initiated => stats.initiated += 1,
            SettlementStatus::NotAccepted => {
                stats.not_accepted += 1;
                match record.blocked_reason() {
                    Some(BlockedReason::AmountExceedsLimit) => stats.blocked_by_limit += 1,
                    Some(BlockedReason::TickerProhibited) => stats.blocked_by_ticker += 1,
                    None => {}
                }
            }
            SettlementStatus::SentToCreate => stats.sent_to_create += 1,
            SettlementStatus::Created => stats.created += 1,
            SettlementStatus::SentToPay => stats.sent_to_pay += 1,
            SettlementStatus::Paid => {
                stats.paid += 1;
                stats.total_paid += record.net_amount;
                stats.total_fees_received += record.total_fees();
            }
        }

        if record.status != SettlementStatus::NotAccepted {
            stats.total_amount += record.net_amount;
        }
    }

    stats
}

/// Per-reason bucket of blocked settlements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonBucket {
    /// Structured rejection reason
    pub reason: BlockedReason,

    /// Number of settlements blocked for this reason
    pub count: usize,

    /// Sum of the gross amounts that were blocked
    pub gross_amount: Decimal,
}

/// Breakdown of `NotAccepted` settlements by rejection reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedBreakdown {
    /// One bucket per reason, in a fixed order
    pub buckets: Vec<ReasonBucket>,
}

impl BlockedBreakdown {
    /// Total number of blocked settlements across all buckets
    pub fn total_blocked(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

/// Partition `NotAccepted` records by their structured rejection reason
///
/// Bucket order is fixed (amount limit first, then prohibited ticker) so
/// the output is deterministic regardless of snapshot order.
pub fn blocked_breakdown(records: &[SettlementRecord]) -> BlockedBreakdown {
    let reasons = [
        BlockedReason::AmountExceedsLimit,
        BlockedReason::TickerProhibited,
    ];

    let mut buckets: Vec<ReasonBucket> = reasons
        .into_iter()
        .map(|reason| ReasonBucket {
            reason,
            count: 0,
            gross_amount: Decimal::ZERO,
        })
        .collect();

    for record in records {
        if record.status != SettlementStatus::NotAccepted {
            continue;
        }
        if let Some(reason) = record.blocked_reason() {
            if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.reason == reason) {
                bucket.count += 1;
                bucket.gross_amount += record.gross_amount;
            }
        }
    }

    BlockedBreakdown { buckets }
}

/// One slice of the status distribution chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSlice {
    /// Settlement status
    pub status: SettlementStatus,

    /// Human-readable label
    pub label: String,

    /// Presentation color token
    pub color_token: String,

    /// Number of records in this status
    pub count: usize,
}

/// Canonical chart order for status distribution
const CHART_ORDER: [SettlementStatus; 6] = [
    SettlementStatus::Paid,
    SettlementStatus::Created,
    SettlementStatus::SentToCreate,
    SettlementStatus::SentToPay,
    SettlementStatus::NotAccepted,
    SettlementStatus::Initiated,
];

/// Count records per status, in the canonical chart order
///
/// Single pass over the snapshot. Labels and color tokens come from the
/// status metadata table; callers render, they never redefine.
pub fn status_distribution(records: &[SettlementRecord]) -> Vec<StatusSlice> {
    // Status discriminants are 1-based
    let mut counts = [0usize; SettlementStatus::ALL.len()];
    for record in records {
        counts[record.status as usize - 1] += 1;
    }

    CHART_ORDER
        .into_iter()
        .map(|status| StatusSlice {
            status,
            label: status.label().to_string(),
            color_token: status.color_token().to_string(),
            count: counts[status as usize - 1],
        })
        .collect()
}
