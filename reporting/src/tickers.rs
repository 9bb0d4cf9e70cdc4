//! Per-ticker frequency
//!
//! Feeds the volume treemap: grouped by ticker, ordered by descending
//! settlement count, ties broken by first appearance in the snapshot.
//! Registry snapshots are ordered by the numeric ID sequence, so first
//! appearance is creation order and the output is deterministic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settlement_core::{SettlementRecord, Ticker};

/// Aggregated activity for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerVolume {
    /// Stock symbol
    pub ticker: Ticker,

    /// Number of settlements for this ticker, rejected ones included
    pub count: usize,

    /// Net volume across the ticker's settlements
    pub volume: Decimal,
}

/// Group a snapshot by ticker
///
/// Rejected settlements count toward frequency but contribute zero volume
/// (their net amount is zero by construction).
pub fn ticker_frequency(records: &[SettlementRecord]) -> Vec<TickerVolume> {
    let mut groups: Vec<TickerVolume> = Vec::new();

    for record in records {
        match groups
            .iter_mut()
            .find(|group| group.ticker == record.ticker)
        {
            Some(group) => {
                group.count += 1;
                group.volume += record.net_amount;
            }
            None => groups.push(TickerVolume {
                ticker: record.ticker.clone(),
                count: 1,
                volume: record.net_amount,
            }),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
