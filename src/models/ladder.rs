//! Fixed-ratio take-profit ladder.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeSide;

/// Two take-profit levels plus a manual-exit remainder.
///
/// The percentages always sum to 100; this is enforced when the planner
/// configuration is constructed, not re-checked per ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeProfitLadder {
    /// Direction inferred from the entry/stop relationship
    pub direction: TradeSide,

    /// `|entry - stop_loss|`, rounded to 2 decimals
    pub risk_distance: Decimal,

    /// First take-profit price (default 0.5R from entry), 2 decimals
    pub tp1_price: Decimal,

    /// Second take-profit price (default 1.25R from entry), 2 decimals
    pub tp2_price: Decimal,

    /// Portion of the position closed at TP1 (percent)
    pub tp1_percent: Decimal,

    /// Portion of the position closed at TP2 (percent)
    pub tp2_percent: Decimal,

    /// Portion left for a manual exit (percent)
    pub manual_percent: Decimal,

    /// TP1 distance as an R-multiple
    pub rr_tp1: Decimal,

    /// TP2 distance as an R-multiple
    pub rr_tp2: Decimal,
}
