//! Risk-based position sizing across three risk tiers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::PlanError;
use crate::models::{PositionSizeResult, RiskTier, RiskTierBreakdown};

use super::{round_qty, round_usd, PlannerConfig};

/// Converts (entry, stop-loss, balance, risk, leverage) into notional
/// size, quantity, and margin.
pub struct PositionSizer {
    config: PlannerConfig,
}

impl PositionSizer {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Size a position for a single risk percentage.
    ///
    /// ```text
    /// max_loss        = balance * risk_percent / 100
    /// risk_per_unit   = |entry - stop_loss| / entry
    /// notional_value  = max_loss / risk_per_unit
    /// quantity        = notional_value / entry
    /// margin_required = notional_value / leverage
    /// ```
    ///
    /// Each output field is rounded half-up independently from the
    /// unrounded intermediates: USD fields to 2 decimals, quantity to 4.
    pub fn calculate_position_size(
        &self,
        entry: Decimal,
        stop_loss: Decimal,
        balance: Decimal,
        risk_percent: Decimal,
        leverage: u32,
    ) -> Result<PositionSizeResult, PlanError> {
        self.size_tier(RiskTier::Normal, entry, stop_loss, balance, risk_percent, leverage)
    }

    /// Size a position for all three risk tiers at once.
    ///
    /// The conservative and aggressive tiers sit `tier_spread` percentage
    /// points below and above the user's tolerance, clamped to the
    /// configured [min, max] range. Within a tolerance of [0.5, 10] the
    /// tiers are ordered conservative <= normal <= aggressive; outside
    /// that range the clamps still hold but the ordering may collapse.
    pub fn calculate_all_modes(
        &self,
        entry: Decimal,
        stop_loss: Decimal,
        balance: Decimal,
        user_risk_tolerance: Decimal,
        leverage: u32,
    ) -> Result<RiskTierBreakdown, PlanError> {
        let conservative_risk =
            (user_risk_tolerance - self.config.tier_spread).max(self.config.min_risk_percent);
        let aggressive_risk =
            (user_risk_tolerance + self.config.tier_spread).min(self.config.max_risk_percent);

        Ok(RiskTierBreakdown {
            conservative: self.size_tier(
                RiskTier::Conservative,
                entry,
                stop_loss,
                balance,
                conservative_risk,
                leverage,
            )?,
            normal: self.size_tier(
                RiskTier::Normal,
                entry,
                stop_loss,
                balance,
                user_risk_tolerance,
                leverage,
            )?,
            aggressive: self.size_tier(
                RiskTier::Aggressive,
                entry,
                stop_loss,
                balance,
                aggressive_risk,
                leverage,
            )?,
        })
    }

    fn size_tier(
        &self,
        tier: RiskTier,
        entry: Decimal,
        stop_loss: Decimal,
        balance: Decimal,
        risk_percent: Decimal,
        leverage: u32,
    ) -> Result<PositionSizeResult, PlanError> {
        if entry <= Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "entry price must be positive, got {entry}"
            )));
        }
        if stop_loss <= Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "stop-loss must be positive, got {stop_loss}"
            )));
        }
        if entry == stop_loss {
            return Err(PlanError::invalid(
                "entry and stop-loss must differ; the risk distance is zero",
            ));
        }
        if balance < Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "balance must not be negative, got {balance}"
            )));
        }
        if risk_percent <= Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "risk percentage must be positive, got {risk_percent}"
            )));
        }
        if leverage == 0 {
            return Err(PlanError::invalid("leverage must be at least 1"));
        }

        let max_loss = balance * risk_percent / dec!(100);
        let risk_per_unit = (entry - stop_loss).abs() / entry;
        let notional_value = max_loss / risk_per_unit;
        let quantity = notional_value / entry;
        let margin_required = notional_value / Decimal::from(leverage);

        Ok(PositionSizeResult {
            tier,
            risk_percent,
            notional_value: round_usd(notional_value),
            quantity: round_qty(quantity),
            margin_required: round_usd(margin_required),
            max_loss: round_usd(max_loss),
            leverage,
        })
    }
}
