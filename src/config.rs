use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// engine tuning knobs shared by the classifier and the statement builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// tolerance absorbed when dividing cumulative receipts into whole
    /// installments, so a payment a few centavos short still counts
    pub paid_tolerance: Decimal,
    /// remaining-installment count at or under which a credit gets the
    /// near-payoff badge instead of plain on-schedule
    pub near_finish_threshold: u32,
}

impl EngineConfig {
    /// length of one monthly cycle. Fixed 30-day arithmetic, not true
    /// calendar months: it drifts over long terms, but historical schedules
    /// were built on it and must not silently move
    pub const MONTHLY_CYCLE_DAYS: i64 = 30;

    pub fn new(paid_tolerance: Decimal, near_finish_threshold: u32) -> Self {
        Self {
            paid_tolerance,
            near_finish_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.paid_tolerance < Decimal::ZERO {
            return Err(EngineError::InvalidConfiguration {
                message: format!("paid_tolerance must be non-negative, got {}", self.paid_tolerance),
            });
        }
        if self.paid_tolerance >= Decimal::ONE {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "paid_tolerance of {} would swallow whole currency units",
                    self.paid_tolerance
                ),
            });
        }
        if self.near_finish_threshold == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "near_finish_threshold must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paid_tolerance: dec!(0.1),
            near_finish_threshold: 3,
        }
    }
}
