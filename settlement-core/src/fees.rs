//! Fee calculation
//!
//! Pure computation from gross amount to itemized fee lines and net amount.
//! Every fee is truncated toward zero at 2 decimals, and the net amount is
//! derived as `gross - total_fees`, so `net + Σfees == gross` holds exactly
//! for any gross amount quoted at minor-unit precision.

use crate::config::CustomFee;
use crate::types::FeeLine;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fee schedule applied to new settlements
///
/// The default schedule charges fixed percentages of the gross amount.
/// An administrator may replace it with flat per-settlement amounts via
/// `AdminSettings::custom_fees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    lines: Vec<ScheduleLine>,
}

/// One line of a fee schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ScheduleLine {
    /// Percentage of the gross amount
    Rate { name: String, rate: Decimal },
    /// Flat amount per settlement
    Flat { name: String, amount: Decimal },
}

impl FeeSchedule {
    /// Standard exchange schedule: brokerage 0.25%, settlement fee 0.10%,
    /// exchange levy 0.12% of gross
    pub fn standard() -> Self {
        Self {
            lines: vec![
                ScheduleLine::Rate {
                    name: "Brokerage fee".to_string(),
                    rate: Decimal::new(25, 4), // 0.0025
                },
                ScheduleLine::Rate {
                    name: "Settlement fee".to_string(),
                    rate: Decimal::new(10, 4), // 0.0010
                },
                ScheduleLine::Rate {
                    name: "Exchange levy".to_string(),
                    rate: Decimal::new(12, 4), // 0.0012
                },
            ],
        }
    }

    /// Flat schedule built from admin-configured custom fees
    pub fn flat(custom_fees: &[CustomFee]) -> Self {
        Self {
            lines: custom_fees
                .iter()
                .map(|fee| ScheduleLine::Flat {
                    name: fee.name.clone(),
                    amount: fee.amount,
                })
                .collect(),
        }
    }

    /// Select the schedule for the given custom-fee configuration:
    /// flat amounts when configured, otherwise the standard rates
    pub fn for_custom_fees(custom_fees: &[CustomFee]) -> Self {
        if custom_fees.is_empty() {
            Self::standard()
        } else {
            Self::flat(custom_fees)
        }
    }

    /// Compute itemized fees and net amount for a gross amount
    ///
    /// Pure function: no side effects, deterministic in its inputs.
    /// `gross = 0` yields all-zero fees and zero net.
    pub fn compute(&self, gross: Decimal) -> FeeBreakdown {
        let fees: Vec<FeeLine> = self
            .lines
            .iter()
            .map(|line| match line {
                ScheduleLine::Rate { name, rate } => FeeLine {
                    name: name.clone(),
                    amount: truncate_minor_units(gross * rate),
                },
                ScheduleLine::Flat { name, amount } => FeeLine {
                    name: name.clone(),
                    amount: truncate_minor_units(*amount),
                },
            })
            .collect();

        let total_fees: Decimal = fees.iter().map(|fee| fee.amount).sum();

        FeeBreakdown {
            net_amount: gross - total_fees,
            fees,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of a fee computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Ordered fee lines
    pub fees: Vec<FeeLine>,

    /// `gross - Σfees`
    pub net_amount: Decimal,
}

impl FeeBreakdown {
    /// Sum of all fee lines
    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|fee| fee.amount).sum()
    }
}

/// Truncate to 2 decimals (round toward zero, never away)
///
/// Truncation is used instead of banker's rounding so that displayed fee
/// lines always sum to the displayed total.
fn truncate_minor_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
