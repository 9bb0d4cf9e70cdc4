//! Core types for the settlement engine
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Serde serialization throughout
//! - A single canonical status enumeration consumed (never redefined) by
//!   presentation collaborators

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Settlement identifier in the `LIQ-<year>-<sequence>` format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(String);

impl SettlementId {
    /// Create new settlement ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an ID from its year and sequence parts
    pub fn from_parts(year: i32, sequence: u64) -> Self {
        Self(format!("LIQ-{}-{:03}", year, sequence))
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric sequence component, if the ID is in the standard format
    ///
    /// Sequences are allocated monotonically, so ordering by sequence is
    /// creation order even past the padding width of `from_parts`.
    pub fn sequence(&self) -> Option<u64> {
        self.0.rsplit('-').next()?.parse().ok()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock symbol, normalized to uppercase at construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Create new ticker, trimming whitespace and uppercasing
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_uppercase())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no symbol remains after normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Ticker {
    fn from(symbol: String) -> Self {
        Ticker::new(symbol)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settlement status (closed enumeration)
///
/// Legal transitions form a directed acyclic path:
///
/// ```text
/// Initiated -> SentToCreate -> Created -> SentToPay -> Paid
/// Initiated -> NotAccepted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettlementStatus {
    /// Initial state after creation
    Initiated = 1,
    /// Rejected by the admission policy (terminal)
    NotAccepted = 2,
    /// Sent to the clearing house for creation
    SentToCreate = 3,
    /// Created at the clearing house
    Created = 4,
    /// Sent for payment
    SentToPay = 5,
    /// Paid out (terminal)
    Paid = 6,
}

impl SettlementStatus {
    /// All status values, in lifecycle order
    pub const ALL: [SettlementStatus; 6] = [
        SettlementStatus::Initiated,
        SettlementStatus::NotAccepted,
        SettlementStatus::SentToCreate,
        SettlementStatus::Created,
        SettlementStatus::SentToPay,
        SettlementStatus::Paid,
    ];

    /// Canonical variant name
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Initiated => "Initiated",
            SettlementStatus::NotAccepted => "NotAccepted",
            SettlementStatus::SentToCreate => "SentToCreate",
            SettlementStatus::Created => "Created",
            SettlementStatus::SentToPay => "SentToPay",
            SettlementStatus::Paid => "Paid",
        }
    }

    /// Human-readable display label
    pub fn label(&self) -> &'static str {
        match self {
            SettlementStatus::Initiated => "Initiated",
            SettlementStatus::NotAccepted => "Not Accepted",
            SettlementStatus::SentToCreate => "Sent to Create",
            SettlementStatus::Created => "Created",
            SettlementStatus::SentToPay => "Sent to Pay",
            SettlementStatus::Paid => "Paid",
        }
    }

    /// Theme token for chart/table coloring
    pub fn color_token(&self) -> &'static str {
        match self {
            SettlementStatus::Initiated => "status-initiated",
            SettlementStatus::NotAccepted => "status-notaccepted",
            SettlementStatus::SentToCreate => "status-senttocreate",
            SettlementStatus::Created => "status-created",
            SettlementStatus::SentToPay => "status-senttopay",
            SettlementStatus::Paid => "status-paid",
        }
    }

    /// Check if status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SettlementStatus::Paid | SettlementStatus::NotAccepted
        )
    }

    /// Legal direct successors of this status
    pub fn successors(&self) -> &'static [SettlementStatus] {
        match self {
            SettlementStatus::Initiated => {
                &[SettlementStatus::SentToCreate, SettlementStatus::NotAccepted]
            }
            SettlementStatus::SentToCreate => &[SettlementStatus::Created],
            SettlementStatus::Created => &[SettlementStatus::SentToPay],
            SettlementStatus::SentToPay => &[SettlementStatus::Paid],
            SettlementStatus::NotAccepted | SettlementStatus::Paid => &[],
        }
    }

    /// Check whether `target` is exactly one legal step away
    pub fn can_transition_to(&self, target: SettlementStatus) -> bool {
        self.successors().contains(&target)
    }

    /// Canonical history description for entering this status
    pub fn transition_description(&self) -> &'static str {
        match self {
            SettlementStatus::Initiated => "Settlement initiated",
            SettlementStatus::NotAccepted => "Not accepted",
            SettlementStatus::SentToCreate => "Sent to clearing for creation",
            SettlementStatus::Created => "Created at clearing",
            SettlementStatus::SentToPay => "Sent for payment",
            SettlementStatus::Paid => "Settlement paid",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason a settlement was blocked by the admission policy (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockedReason {
    /// Gross amount exceeds the configured maximum
    AmountExceedsLimit,
    /// Ticker is on the prohibited list
    TickerProhibited,
}

impl BlockedReason {
    /// Canonical variant name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockedReason::AmountExceedsLimit => "AmountExceedsLimit",
            BlockedReason::TickerProhibited => "TickerProhibited",
        }
    }
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One itemized fee line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLine {
    /// Fee name (e.g. "Brokerage fee")
    pub name: String,

    /// Fee amount, 2-decimal minor-unit precision
    pub amount: Decimal,
}

/// Append-only history event on a settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Status entered by this event
    pub status: SettlementStatus,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// Human-readable description
    pub description: String,

    /// Structured rejection reason (set on `NotAccepted` entries written by
    /// the admission policy; never inferred from the description text)
    #[serde(default)]
    pub reason: Option<BlockedReason>,
}

impl HistoryEntry {
    /// Create new history entry
    pub fn new(
        status: SettlementStatus,
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            status,
            timestamp,
            description: description.into(),
            reason: None,
        }
    }

    /// Attach a structured rejection reason
    pub fn with_reason(mut self, reason: BlockedReason) -> Self {
        self.reason = Some(reason);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Ticker::new(" petr4 ").as_str(), "PETR4");
        assert_eq!(Ticker::new("OIBR3"), Ticker::new("oibr3"));
    }

    #[test]
    fn test_id_format() {
        assert_eq!(SettlementId::from_parts(2024, 7).as_str(), "LIQ-2024-007");
        assert_eq!(
            SettlementId::from_parts(2024, 1234).as_str(),
            "LIQ-2024-1234"
        );
    }

    #[test]
    fn test_id_sequence() {
        assert_eq!(SettlementId::from_parts(2024, 7).sequence(), Some(7));
        assert_eq!(SettlementId::from_parts(2026, 1000).sequence(), Some(1000));
        assert_eq!(SettlementId::new("ad-hoc").sequence(), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SettlementStatus::Paid.is_terminal());
        assert!(SettlementStatus::NotAccepted.is_terminal());
        assert!(!SettlementStatus::Initiated.is_terminal());
        assert!(!SettlementStatus::SentToPay.is_terminal());
    }

    #[test]
    fn test_successor_table() {
        use SettlementStatus::*;

        assert!(Initiated.can_transition_to(SentToCreate));
        assert!(Initiated.can_transition_to(NotAccepted));
        assert!(!Initiated.can_transition_to(Paid));
        assert!(SentToCreate.can_transition_to(Created));
        assert!(Created.can_transition_to(SentToPay));
        assert!(SentToPay.can_transition_to(Paid));
        assert!(Paid.successors().is_empty());
        assert!(NotAccepted.successors().is_empty());
    }

    #[test]
    fn test_status_serde_uses_variant_names() {
        let json = serde_json::to_string(&SettlementStatus::SentToPay).unwrap();
        assert_eq!(json, "\"SentToPay\"");

        let status: SettlementStatus = serde_json::from_str("\"NotAccepted\"").unwrap();
        assert_eq!(status, SettlementStatus::NotAccepted);
    }

    #[test]
    fn test_ticker_deserializes_normalized() {
        let ticker: Ticker = serde_json::from_str("\"vale3\"").unwrap();
        assert_eq!(ticker.as_str(), "VALE3");
    }
}
