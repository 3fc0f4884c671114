//! Order plan: the ordered set of legs handed to the exchange sink.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeSide;

/// Buy/sell side of an individual order leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        }
    }

    pub fn opposite(&self) -> OrderSide {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    /// Order side that opens a position in the given direction.
    pub fn entry_for(direction: TradeSide) -> OrderSide {
        match direction {
            TradeSide::Long => OrderSide::Buy,
            TradeSide::Short => OrderSide::Sell,
        }
    }
}

/// What a leg is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    Entry,
    StopLoss,
    TakeProfit,
}

/// Execution style of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Resting limit order at `price`
    Limit,
    /// Market order fired when `price` trades (stop-loss trigger)
    MarketTrigger,
}

/// One order in a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLeg {
    pub role: LegRole,
    pub side: OrderSide,
    pub kind: OrderKind,

    /// Limit price, or trigger price for `MarketTrigger` legs
    pub price: Decimal,

    /// Always positive; plans with a zero-rounding quantity are rejected
    /// before a leg is built
    pub quantity: Decimal,

    /// Exit legs may only shrink the position, never flip it
    pub reduce_only: bool,

    /// 1-based index among legs of the same role (scaled entries, TP1/TP2)
    pub sequence: u32,
}

/// Whether a plan made it past the idempotency guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Placed,
    Skipped,
}

/// Why a plan was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ExistingOrdersFound,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ExistingOrdersFound => "existing_orders_found",
        }
    }
}

/// Ordered legs (entries, then stop-loss, then take-profits) plus the
/// manual-exit remainder. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlan {
    pub symbol: String,
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    pub legs: Vec<OrderLeg>,

    /// Full position quantity across all entry legs
    pub total_quantity: Decimal,

    /// Quantity not covered by any take-profit leg, exited manually
    pub manual_quantity: Decimal,
}

impl OrderPlan {
    /// A plan stopped by the idempotency guard: no legs, nothing to place.
    pub fn skipped(symbol: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            symbol: symbol.into(),
            status: PlanStatus::Skipped,
            skip_reason: Some(reason),
            legs: Vec::new(),
            total_quantity: Decimal::ZERO,
            manual_quantity: Decimal::ZERO,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == PlanStatus::Skipped
    }

    pub fn entry_legs(&self) -> impl Iterator<Item = &OrderLeg> {
        self.legs.iter().filter(|l| l.role == LegRole::Entry)
    }

    pub fn stop_loss_leg(&self) -> Option<&OrderLeg> {
        self.legs.iter().find(|l| l.role == LegRole::StopLoss)
    }

    pub fn take_profit_legs(&self) -> impl Iterator<Item = &OrderLeg> {
        self.legs.iter().filter(|l| l.role == LegRole::TakeProfit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_skipped_plan_has_no_legs() {
        let plan = OrderPlan::skipped("BTCUSDT", SkipReason::ExistingOrdersFound);
        assert!(plan.is_skipped());
        assert!(plan.legs.is_empty());
        assert_eq!(plan.skip_reason, Some(SkipReason::ExistingOrdersFound));
        assert_eq!(plan.manual_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_leg_accessors() {
        let leg = |role, seq| OrderLeg {
            role,
            side: OrderSide::Buy,
            kind: OrderKind::Limit,
            price: dec!(100),
            quantity: dec!(1),
            reduce_only: false,
            sequence: seq,
        };
        let plan = OrderPlan {
            symbol: "ETHUSDT".to_string(),
            status: PlanStatus::Placed,
            skip_reason: None,
            legs: vec![
                leg(LegRole::Entry, 1),
                leg(LegRole::Entry, 2),
                leg(LegRole::StopLoss, 1),
                leg(LegRole::TakeProfit, 1),
            ],
            total_quantity: dec!(2),
            manual_quantity: dec!(0.3),
        };
        assert_eq!(plan.entry_legs().count(), 2);
        assert!(plan.stop_loss_leg().is_some());
        assert_eq!(plan.take_profit_legs().count(), 1);
    }

    #[test]
    fn test_entry_side_for_direction() {
        assert_eq!(OrderSide::entry_for(TradeSide::Long), OrderSide::Buy);
        assert_eq!(OrderSide::entry_for(TradeSide::Short), OrderSide::Sell);
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }
}
