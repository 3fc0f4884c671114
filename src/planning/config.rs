//! Planner configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Configuration for the sizing engine, ladder, and plan builder.
///
/// Defaults reproduce the production constants: a 35/50/15 ladder at
/// 0.5R / 1.25R, and risk tiers spread ±2% around the user's tolerance,
/// clamped to [0.5, 10].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Portion of the position closed at TP1 (percent)
    pub tp1_percent: Decimal,

    /// Portion of the position closed at TP2 (percent)
    pub tp2_percent: Decimal,

    /// Portion left for a manual exit (percent)
    pub manual_percent: Decimal,

    /// TP1 distance from entry as an R-multiple
    pub rr_tp1: Decimal,

    /// TP2 distance from entry as an R-multiple
    pub rr_tp2: Decimal,

    /// Floor for the conservative tier's risk percentage
    pub min_risk_percent: Decimal,

    /// Ceiling for the aggressive tier's risk percentage
    pub max_risk_percent: Decimal,

    /// How far the conservative/aggressive tiers sit from the user's
    /// tolerance (percentage points)
    pub tier_spread: Decimal,
}

impl PlannerConfig {
    /// Build a configuration, checking its internal consistency.
    ///
    /// The ladder percentages must sum to exactly 100 so that every
    /// produced `TakeProfitLadder` carries that invariant for free.
    pub fn new(
        tp1_percent: Decimal,
        tp2_percent: Decimal,
        manual_percent: Decimal,
        rr_tp1: Decimal,
        rr_tp2: Decimal,
    ) -> Result<Self, PlanError> {
        let config = Self {
            tp1_percent,
            tp2_percent,
            manual_percent,
            rr_tp1,
            rr_tp2,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let total = self.tp1_percent + self.tp2_percent + self.manual_percent;
        if total != dec!(100) {
            return Err(PlanError::invalid(format!(
                "ladder percentages must sum to 100, got {total}"
            )));
        }
        if self.tp1_percent <= Decimal::ZERO || self.tp2_percent <= Decimal::ZERO {
            return Err(PlanError::invalid("take-profit percentages must be positive"));
        }
        if self.manual_percent < Decimal::ZERO {
            return Err(PlanError::invalid("manual percentage must not be negative"));
        }
        if self.rr_tp1 <= Decimal::ZERO || self.rr_tp2 <= self.rr_tp1 {
            return Err(PlanError::invalid(
                "R-multiples must be positive and strictly increasing",
            ));
        }
        if self.min_risk_percent <= Decimal::ZERO
            || self.max_risk_percent < self.min_risk_percent
        {
            return Err(PlanError::invalid("risk clamp range is inverted"));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tp1_percent: dec!(35),
            tp2_percent: dec!(50),
            manual_percent: dec!(15),
            rr_tp1: dec!(0.5),
            rr_tp2: dec!(1.25),
            min_risk_percent: dec!(0.5),
            max_risk_percent: dec!(10.0),
            tier_spread: dec!(2),
        }
    }
}
