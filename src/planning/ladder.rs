//! Take-profit ladder computation and direction inference.

use rust_decimal::Decimal;

use crate::error::PlanError;
use crate::models::{TakeProfitLadder, TradeSide};

use super::{round_usd, PlannerConfig};

/// Computes the fixed-ratio take-profit ladder for a trade.
pub struct TakeProfitPlanner {
    config: PlannerConfig,
}

impl TakeProfitPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Build the ladder for the given entry and stop-loss.
    ///
    /// Direction is inferred, never supplied: a stop below the entry is a
    /// long, a stop above it a short. Equal prices are rejected — a
    /// zero-width ladder is degenerate, and the matching sizing call would
    /// divide by a zero risk fraction.
    pub fn calculate_take_profits(
        &self,
        entry: Decimal,
        stop_loss: Decimal,
    ) -> Result<TakeProfitLadder, PlanError> {
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

        let direction = if stop_loss < entry {
            TradeSide::Long
        } else {
            TradeSide::Short
        };

        let risk_distance = (entry - stop_loss).abs();
        let (tp1, tp2) = match direction {
            TradeSide::Long => (
                entry + self.config.rr_tp1 * risk_distance,
                entry + self.config.rr_tp2 * risk_distance,
            ),
            TradeSide::Short => (
                entry - self.config.rr_tp1 * risk_distance,
                entry - self.config.rr_tp2 * risk_distance,
            ),
        };

        Ok(TakeProfitLadder {
            direction,
            risk_distance: round_usd(risk_distance),
            tp1_price: round_usd(tp1),
            tp2_price: round_usd(tp2),
            tp1_percent: self.config.tp1_percent,
            tp2_percent: self.config.tp2_percent,
            manual_percent: self.config.manual_percent,
            rr_tp1: self.config.rr_tp1,
            rr_tp2: self.config.rr_tp2,
        })
    }
}
