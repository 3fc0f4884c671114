//! No-op exchange sink: logs every leg and fabricates order ids.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{LegRole, OrderKind, OrderLeg};

use super::{ExchangeOrderSink, OpenOrder, OrderAck};

/// Sink that accepts everything without touching a venue.
///
/// Reports no open orders, so the idempotency guard never trips against
/// it. Useful for dry runs and as the default until a live exchange
/// client exists.
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExchangeOrderSink for NullSink {
    async fn fetch_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>> {
        info!(symbol = %symbol, "fetching open orders (null sink: none)");
        Ok(Vec::new())
    }

    async fn place_orders(&self, symbol: &str, legs: &[OrderLeg]) -> Result<Vec<OrderAck>> {
        info!(symbol = %symbol, legs = legs.len(), "placing order plan (null sink)");

        let mut acks = Vec::with_capacity(legs.len());
        for leg in legs {
            let label = match (leg.role, leg.kind) {
                (LegRole::Entry, _) => "entry",
                (LegRole::StopLoss, _) => "stop-loss",
                (LegRole::TakeProfit, _) => "take-profit",
            };
            match leg.kind {
                OrderKind::Limit => info!(
                    symbol = %symbol,
                    side = leg.side.as_str(),
                    qty = %leg.quantity,
                    price = %leg.price,
                    reduce_only = leg.reduce_only,
                    "{} limit order", label
                ),
                OrderKind::MarketTrigger => info!(
                    symbol = %symbol,
                    side = leg.side.as_str(),
                    qty = %leg.quantity,
                    trigger = %leg.price,
                    "{} trigger order", label
                ),
            }
            acks.push(OrderAck {
                order_id: Uuid::new_v4().to_string(),
                role: leg.role,
                sequence: leg.sequence,
                placed_at: Utc::now(),
            });
        }
        Ok(acks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderSide, PlanStatus};
    use crate::planning::{OrderPlanBuilder, PlannerConfig, PositionSizer, TakeProfitPlanner};
    use crate::models::TradeIntent;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_null_sink_acks_every_leg() {
        let config = PlannerConfig::default();
        let sizing = PositionSizer::new(config.clone())
            .calculate_position_size(dec!(50000), dec!(49000), dec!(10000), dec!(3), 1)
            .unwrap();
        let ladder = TakeProfitPlanner::new(config)
            .calculate_take_profits(dec!(50000), dec!(49000))
            .unwrap();
        let intent = TradeIntent {
            symbol: "BTCUSDT".to_string(),
            side: None,
            entries: vec![dec!(50000)],
            stop_loss: dec!(49000),
            leverage: None,
        };
        let plan = OrderPlanBuilder::new()
            .build_order_plan(&intent, &sizing, &ladder, &[], true)
            .unwrap();
        assert_eq!(plan.status, PlanStatus::Placed);

        let sink = NullSink::new();
        assert!(sink.fetch_open_orders("BTCUSDT").await.unwrap().is_empty());

        let acks = sink.place_orders("BTCUSDT", &plan.legs).await.unwrap();
        assert_eq!(acks.len(), plan.legs.len());
        assert!(acks.iter().all(|a| !a.order_id.is_empty()));
    }

    #[tokio::test]
    async fn test_acks_carry_roles_in_leg_order() {
        let sink = NullSink::new();
        let legs = vec![OrderLeg {
            role: LegRole::StopLoss,
            side: OrderSide::Sell,
            kind: OrderKind::MarketTrigger,
            price: dec!(49000),
            quantity: dec!(0.3),
            reduce_only: true,
            sequence: 1,
        }];
        let acks = sink.place_orders("BTCUSDT", &legs).await.unwrap();
        assert_eq!(acks[0].role, LegRole::StopLoss);
        assert_eq!(acks[0].sequence, 1);
    }
}
