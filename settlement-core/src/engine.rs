//! Settlement engine facade
//!
//! Orchestrates admission, fee calculation, the registry, and admin
//! settings. This is the surface consumed by UI, reporting, and
//! administrative collaborators.

use crate::admission::{self, Decision};
use crate::config::{AdminSettings, SettingsPatch};
use crate::fees::FeeSchedule;
use crate::record::SettlementRecord;
use crate::registry::SettlementRegistry;
use crate::types::{BlockedReason, SettlementId, SettlementStatus, Ticker};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Creation request for a new settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSettlement {
    /// Stock symbol (normalized to uppercase by the engine)
    pub ticker: String,

    /// Number of shares (must be positive)
    pub shares: u64,

    /// Pre-fee transaction value (must be positive)
    pub gross_amount: Decimal,

    /// Originating broker
    pub broker_name: String,

    /// Scheduled payment date (not required to be in the future)
    pub payment_date: NaiveDate,
}

impl NewSettlement {
    fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(Error::Validation("ticker is required".to_string()));
        }
        if self.shares == 0 {
            return Err(Error::Validation("shares must be positive".to_string()));
        }
        if self.gross_amount <= Decimal::ZERO {
            return Err(Error::Validation(
                "gross amount must be positive".to_string(),
            ));
        }
        if self.broker_name.trim().is_empty() {
            return Err(Error::Validation("broker name is required".to_string()));
        }
        Ok(())
    }
}

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Record store
    registry: SettlementRegistry,

    /// Process-wide admin settings; cloned per admission call so the policy
    /// stays a pure function of its inputs
    settings: RwLock<AdminSettings>,
}

impl SettlementEngine {
    /// Create new engine with the given settings
    pub fn new(settings: AdminSettings) -> Self {
        Self {
            registry: SettlementRegistry::new(),
            settings: RwLock::new(settings),
        }
    }

    /// Create engine with default settings
    pub fn with_defaults() -> Self {
        Self::new(AdminSettings::default())
    }

    /// Create a settlement: admission policy first, then fee calculation
    ///
    /// Returns the record in whichever status was determined. A rejected
    /// request is not an error: the record is registered in terminal
    /// `NotAccepted` for audit. Repeating a rejected creation with the same
    /// inputs rejects identically.
    pub fn create_settlement(&self, request: NewSettlement) -> Result<SettlementRecord> {
        request.validate()?;

        let ticker = Ticker::new(&request.ticker);
        let settings = self.settings.read().clone();
        let now = Utc::now();
        let id = self.registry.next_id(now.year());

        let record = match admission::evaluate(request.gross_amount, &ticker, &settings) {
            Decision::Accept => {
                let breakdown = FeeSchedule::for_custom_fees(&settings.custom_fees)
                    .compute(request.gross_amount);
                if breakdown.net_amount < Decimal::ZERO {
                    return Err(Error::Validation(format!(
                        "configured fees {} exceed gross amount {}",
                        breakdown.total_fees(),
                        request.gross_amount
                    )));
                }

                SettlementRecord::new_accepted(
                    id,
                    ticker,
                    request.shares,
                    request.gross_amount,
                    breakdown,
                    request.broker_name,
                    now.date_naive(),
                    request.payment_date,
                    now,
                )
            }
            Decision::Reject(reason) => {
                warn!(
                    ticker = %ticker,
                    gross = %request.gross_amount,
                    reason = %reason,
                    "settlement blocked by admission policy"
                );

                let description = rejection_description(
                    reason,
                    request.gross_amount,
                    &ticker,
                    settings.max_settlement_amount,
                );

                SettlementRecord::new_rejected(
                    id,
                    ticker,
                    request.shares,
                    request.gross_amount,
                    request.broker_name,
                    now.date_naive(),
                    request.payment_date,
                    reason,
                    description,
                    now,
                )
            }
        };

        self.registry.insert(record.clone())?;

        info!(
            id = %record.id,
            status = %record.status,
            net = %record.net_amount,
            "settlement created"
        );

        Ok(record)
    }

    /// Advance a record exactly one step along the legal path
    pub fn transition(
        &self,
        id: &SettlementId,
        target: SettlementStatus,
    ) -> Result<SettlementRecord> {
        let record = self.registry.transition(id, target)?;
        info!(id = %record.id, status = %record.status, "settlement transitioned");
        Ok(record)
    }

    /// Get a snapshot copy of a record
    pub fn get(&self, id: &SettlementId) -> Option<SettlementRecord> {
        self.registry.get(id)
    }

    /// Snapshot of all records, in creation order
    pub fn snapshot(&self) -> Vec<SettlementRecord> {
        self.registry.snapshot()
    }

    /// Current admin settings (copy)
    pub fn settings(&self) -> AdminSettings {
        self.settings.read().clone()
    }

    /// Apply a settings patch; on validation failure the previous
    /// configuration remains in effect
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<AdminSettings> {
        let mut guard = self.settings.write();
        let next = guard.apply_patch(patch)?;
        *guard = next.clone();

        info!(
            max_settlement_amount = %next.max_settlement_amount,
            prohibited = next.prohibited_tickers.len(),
            "admin settings updated"
        );

        Ok(next)
    }

    /// Direct registry access for embedding collaborators
    pub fn registry(&self) -> &SettlementRegistry {
        &self.registry
    }
}

fn rejection_description(
    reason: BlockedReason,
    gross: Decimal,
    ticker: &Ticker,
    limit: Decimal,
) -> String {
    match reason {
        BlockedReason::AmountExceedsLimit => format!(
            "Not accepted: gross amount {} exceeds limit {} ({})",
            gross,
            limit,
            reason.as_str()
        ),
        BlockedReason::TickerProhibited => format!(
            "Not accepted: ticker {} is on the prohibited list ({})",
            ticker,
            reason.as_str()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ticker: &str, gross: Decimal) -> NewSettlement {
        NewSettlement {
            ticker: ticker.to_string(),
            shares: 1000,
            gross_amount: gross,
            broker_name: "XP Investimentos".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        }
    }

    #[test]
    fn test_accepted_creation() {
        let engine = SettlementEngine::with_defaults();
        let record = engine
            .create_settlement(request("petr4", Decimal::new(12_500_000, 2)))
            .unwrap();

        assert_eq!(record.status, SettlementStatus::Initiated);
        assert_eq!(record.ticker.as_str(), "PETR4");
        assert_eq!(record.fees.len(), 3);
        assert!(record.net_amount < record.gross_amount);
        assert_eq!(
            record.net_amount + record.total_fees(),
            record.gross_amount
        );
    }

    #[test]
    fn test_rejected_over_limit() {
        let engine = SettlementEngine::with_defaults();
        let record = engine
            .create_settlement(request("BBAS3", Decimal::from(600_000)))
            .unwrap();

        assert_eq!(record.status, SettlementStatus::NotAccepted);
        assert!(record.fees.is_empty());
        assert_eq!(record.net_amount, Decimal::ZERO);
        assert_eq!(record.history.len(), 2);
        assert_eq!(
            record.blocked_reason(),
            Some(BlockedReason::AmountExceedsLimit)
        );
        assert!(record.history[1]
            .description
            .contains("AmountExceedsLimit"));
        // Rejected attempts are registered, not discarded
        assert_eq!(engine.registry().len(), 1);
    }

    #[test]
    fn test_rejected_prohibited_ticker() {
        let engine = SettlementEngine::with_defaults();
        let record = engine
            .create_settlement(request("OIBR3", Decimal::from(75_000)))
            .unwrap();

        assert_eq!(record.status, SettlementStatus::NotAccepted);
        assert_eq!(
            record.blocked_reason(),
            Some(BlockedReason::TickerProhibited)
        );
    }

    #[test]
    fn test_rejection_is_deterministic() {
        let engine = SettlementEngine::with_defaults();
        let first = engine
            .create_settlement(request("OIBR3", Decimal::from(75_000)))
            .unwrap();
        let second = engine
            .create_settlement(request("OIBR3", Decimal::from(75_000)))
            .unwrap();

        assert_eq!(first.status, second.status);
        assert_eq!(first.blocked_reason(), second.blocked_reason());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_validation_errors() {
        let engine = SettlementEngine::with_defaults();

        let mut invalid = request("PETR4", Decimal::from(1000));
        invalid.shares = 0;
        assert!(matches!(
            engine.create_settlement(invalid),
            Err(Error::Validation(_))
        ));

        assert!(matches!(
            engine.create_settlement(request("  ", Decimal::from(1000))),
            Err(Error::Validation(_))
        ));

        assert!(matches!(
            engine.create_settlement(request("PETR4", Decimal::ZERO)),
            Err(Error::Validation(_))
        ));

        // Nothing was registered
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_transition_via_engine() {
        let engine = SettlementEngine::with_defaults();
        let record = engine
            .create_settlement(request("PETR4", Decimal::from(125_000)))
            .unwrap();

        let updated = engine
            .transition(&record.id, SettlementStatus::SentToCreate)
            .unwrap();
        assert_eq!(updated.status, SettlementStatus::SentToCreate);

        let result = engine.transition(&record.id, SettlementStatus::Paid);
        assert!(matches!(result, Err(Error::InvalidTransition { .. })));
    }

    #[test]
    fn test_custom_fees_replace_standard_schedule() {
        let engine = SettlementEngine::with_defaults();
        engine
            .update_settings(SettingsPatch {
                custom_fees: Some(vec![crate::config::CustomFee {
                    id: "1".to_string(),
                    name: "Flat brokerage".to_string(),
                    amount: Decimal::new(35000, 2), // 350.00
                }]),
                ..Default::default()
            })
            .unwrap();

        let record = engine
            .create_settlement(request("VALE3", Decimal::from(50_000)))
            .unwrap();

        assert_eq!(record.fees.len(), 1);
        assert_eq!(record.fees[0].name, "Flat brokerage");
        assert_eq!(record.fees[0].amount, Decimal::new(35000, 2));
    }

    #[test]
    fn test_update_settings_keeps_old_on_failure() {
        let engine = SettlementEngine::with_defaults();
        let before = engine.settings();

        let result = engine.update_settings(SettingsPatch {
            max_settlement_amount: Some(Decimal::from(-1)),
            ..Default::default()
        });

        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(engine.settings(), before);
    }

    #[test]
    fn test_settings_snapshot_per_admission() {
        let engine = SettlementEngine::with_defaults();

        // Tighten the limit, then verify the next admission sees it.
        engine
            .update_settings(SettingsPatch {
                max_settlement_amount: Some(Decimal::from(100_000)),
                ..Default::default()
            })
            .unwrap();

        let record = engine
            .create_settlement(request("PETR4", Decimal::from(125_000)))
            .unwrap();
        assert_eq!(record.status, SettlementStatus::NotAccepted);
    }
}
