//! Administrative configuration
//!
//! `AdminSettings` is process-wide state mutated by an administrator and
//! read by every admission check. It is always passed explicitly into policy
//! evaluation so the policy stays a pure function of its inputs.

use crate::types::Ticker;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Admin-configured fee schedule entry (flat amount per settlement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFee {
    /// Stable entry ID
    pub id: String,

    /// Fee name
    pub name: String,

    /// Flat fee amount (must be positive)
    pub amount: Decimal,
}

/// Admin settings consumed by the admission policy and fee calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Maximum gross amount accepted per settlement
    pub max_settlement_amount: Decimal,

    /// Prohibited tickers (uppercase, deduplicated)
    pub prohibited_tickers: BTreeSet<Ticker>,

    /// Default fee schedule for new settlements; empty selects the standard
    /// percentage schedule
    #[serde(default)]
    pub custom_fees: Vec<CustomFee>,

    /// Settlement account used for payout instructions
    pub settlement_account: String,

    /// Advance-payment volume ceiling (administrative metadata)
    pub advanced_volume: Decimal,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            max_settlement_amount: Decimal::new(50_000_000, 2), // 500,000.00
            prohibited_tickers: ["OIBR3", "OIBR4", "IRBR3"]
                .into_iter()
                .map(Ticker::new)
                .collect(),
            custom_fees: Vec::new(),
            settlement_account: "001-12345-6".to_string(),
            advanced_volume: Decimal::new(60_000_000, 2), // 600,000.00
        }
    }
}

impl AdminSettings {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: AdminSettings = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut settings = AdminSettings::default();

        if let Ok(amount) = std::env::var("LIQTRACK_MAX_SETTLEMENT_AMOUNT") {
            settings.max_settlement_amount = amount
                .parse::<Decimal>()
                .map_err(|e| Error::Config(format!("Invalid max settlement amount: {}", e)))?;
        }

        if let Ok(tickers) = std::env::var("LIQTRACK_PROHIBITED_TICKERS") {
            settings.prohibited_tickers = tickers
                .split(',')
                .filter(|symbol| !symbol.trim().is_empty())
                .map(Ticker::new)
                .collect();
        }

        if let Ok(account) = std::env::var("LIQTRACK_SETTLEMENT_ACCOUNT") {
            settings.settlement_account = account;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings invariants
    pub fn validate(&self) -> Result<()> {
        if self.max_settlement_amount <= Decimal::ZERO {
            return Err(Error::Config(
                "max_settlement_amount must be positive".to_string(),
            ));
        }

        for fee in &self.custom_fees {
            if fee.name.trim().is_empty() {
                return Err(Error::Config(format!(
                    "custom fee {} has an empty name",
                    fee.id
                )));
            }
            if fee.amount <= Decimal::ZERO {
                return Err(Error::Config(format!(
                    "custom fee '{}' must have a positive amount",
                    fee.name
                )));
            }
        }

        if self.prohibited_tickers.iter().any(Ticker::is_empty) {
            return Err(Error::Config(
                "prohibited_tickers must not contain empty symbols".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply a partial update, validating before anything is mutated
    ///
    /// Returns the new settings; on error the previous settings are
    /// untouched and remain in effect.
    pub fn apply_patch(&self, patch: SettingsPatch) -> Result<AdminSettings> {
        let mut next = self.clone();

        if let Some(amount) = patch.max_settlement_amount {
            next.max_settlement_amount = amount;
        }
        if let Some(tickers) = patch.prohibited_tickers {
            next.prohibited_tickers = tickers;
        }
        if let Some(fees) = patch.custom_fees {
            next.custom_fees = fees;
        }
        if let Some(account) = patch.settlement_account {
            next.settlement_account = account;
        }
        if let Some(volume) = patch.advanced_volume {
            next.advanced_volume = volume;
        }

        next.validate()?;
        Ok(next)
    }
}

/// Partial update to `AdminSettings`
///
/// `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    /// New maximum gross amount
    pub max_settlement_amount: Option<Decimal>,

    /// Replacement prohibited-ticker set
    pub prohibited_tickers: Option<BTreeSet<Ticker>>,

    /// Replacement custom fee schedule
    pub custom_fees: Option<Vec<CustomFee>>,

    /// New settlement account
    pub settlement_account: Option<String>,

    /// New advance-payment volume ceiling
    pub advanced_volume: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AdminSettings::default();

        assert_eq!(settings.max_settlement_amount, Decimal::new(50_000_000, 2));
        assert!(settings.prohibited_tickers.contains(&Ticker::new("OIBR3")));
        assert_eq!(settings.prohibited_tickers.len(), 3);
        assert!(settings.custom_fees.is_empty());
        settings.validate().unwrap();
    }

    #[test]
    fn test_patch_rejects_non_positive_limit() {
        let settings = AdminSettings::default();
        let patch = SettingsPatch {
            max_settlement_amount: Some(Decimal::ZERO),
            ..Default::default()
        };

        let result = settings.apply_patch(patch);
        assert!(matches!(result, Err(Error::Config(_))));
        // Previous configuration untouched
        assert_eq!(settings.max_settlement_amount, Decimal::new(50_000_000, 2));
    }

    #[test]
    fn test_patch_rejects_non_positive_fee() {
        let settings = AdminSettings::default();
        let patch = SettingsPatch {
            custom_fees: Some(vec![CustomFee {
                id: "1".to_string(),
                name: "Brokerage fee".to_string(),
                amount: Decimal::ZERO,
            }]),
            ..Default::default()
        };

        assert!(settings.apply_patch(patch).is_err());
    }

    #[test]
    fn test_patch_applies_all_fields() {
        let settings = AdminSettings::default();
        let patch = SettingsPatch {
            max_settlement_amount: Some(Decimal::from(750_000)),
            prohibited_tickers: Some([Ticker::new("mglu3")].into_iter().collect()),
            ..Default::default()
        };

        let next = settings.apply_patch(patch).unwrap();
        assert_eq!(next.max_settlement_amount, Decimal::from(750_000));
        assert!(next.prohibited_tickers.contains(&Ticker::new("MGLU3")));
        assert!(!next.prohibited_tickers.contains(&Ticker::new("OIBR3")));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
max_settlement_amount = "250000.00"
prohibited_tickers = ["oibr3", "IRBR3"]
settlement_account = "002-99999-1"
advanced_volume = "100000.00"

[[custom_fees]]
id = "1"
name = "Brokerage fee"
amount = "350.00"
"#
        )
        .unwrap();

        let settings = AdminSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.max_settlement_amount, Decimal::from(250_000));
        assert!(settings.prohibited_tickers.contains(&Ticker::new("OIBR3")));
        assert_eq!(settings.custom_fees.len(), 1);
        assert_eq!(settings.settlement_account, "002-99999-1");
    }

    #[test]
    fn test_from_file_rejects_invalid_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
max_settlement_amount = "0"
prohibited_tickers = []
settlement_account = "001-12345-6"
advanced_volume = "0"
"#
        )
        .unwrap();

        assert!(matches!(
            AdminSettings::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }
}
