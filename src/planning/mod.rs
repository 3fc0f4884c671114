//! The planning core: position sizing, take-profit ladders, and order
//! plan construction.
//!
//! Everything here is pure and synchronous. Inputs arrive as values,
//! outputs are freshly constructed; nothing blocks, retries, or touches
//! the network.

mod builder;
mod config;
mod ladder;
mod sizing;

pub use builder::OrderPlanBuilder;
pub use config::PlannerConfig;
pub use ladder::TakeProfitPlanner;
pub use sizing::PositionSizer;

use rust_decimal::{Decimal, RoundingStrategy};

/// Half-up rounding for USD-denominated fields (2 decimals).
pub(crate) fn round_usd(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Half-up rounding for coin quantities (4 decimals).
pub(crate) fn round_qty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(round_usd(dec!(300.005)), dec!(300.01));
        assert_eq!(round_usd(dec!(300.004)), dec!(300.00));
        assert_eq!(round_qty(dec!(1.66665)), dec!(1.6667));
        assert_eq!(round_qty(dec!(0.00004)), dec!(0.0000));
    }
}
