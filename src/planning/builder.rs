//! Assembles sizing and ladder results into an ordered list of order legs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::error::PlanError;
use crate::exchange::OpenOrder;
use crate::models::{
    LegRole, OrderKind, OrderLeg, OrderPlan, OrderSide, PlanStatus, PositionSizeResult,
    SkipReason, TakeProfitLadder, TradeIntent,
};

use super::round_qty;

/// Composes sizing, ladder, and the idempotency check into an
/// [`OrderPlan`]. The ladder carries its own percentages, so the builder
/// itself holds no configuration.
#[derive(Debug, Default)]
pub struct OrderPlanBuilder;

impl OrderPlanBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the full leg list: entries, then the stop-loss, then the
    /// take-profits, plus the manual-exit remainder.
    ///
    /// When `check_existing` is set and the venue already has open orders
    /// for the symbol, the plan comes back `Skipped` with zero legs. This
    /// guard is check-then-act: the read happened before our write, so two
    /// concurrent calls for one symbol can both pass it. Callers must
    /// serialize per symbol (the bundled pipeline holds a per-symbol lock
    /// across fetch and placement).
    pub fn build_order_plan(
        &self,
        intent: &TradeIntent,
        sizing: &PositionSizeResult,
        ladder: &TakeProfitLadder,
        existing_orders: &[OpenOrder],
        check_existing: bool,
    ) -> Result<OrderPlan, PlanError> {
        intent.validate()?;

        if check_existing && !existing_orders.is_empty() {
            warn!(
                symbol = %intent.symbol,
                existing = existing_orders.len(),
                "open orders already present, skipping placement"
            );
            return Ok(OrderPlan::skipped(
                intent.symbol.clone(),
                SkipReason::ExistingOrdersFound,
            ));
        }

        // Direction comes from the entry/stop relationship; a stated side
        // that disagrees with the numbers loses.
        let direction = match intent.side {
            Some(stated) if stated != ladder.direction => {
                warn!(
                    symbol = %intent.symbol,
                    stated = stated.as_str(),
                    inferred = ladder.direction.as_str(),
                    "signal direction contradicts entry/stop relationship, using inferred"
                );
                ladder.direction
            }
            _ => ladder.direction,
        };
        let entry_side = OrderSide::entry_for(direction);
        let exit_side = entry_side.opposite();

        let total_quantity = sizing.quantity;
        if total_quantity <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "position quantity rounds to zero; balance too small for this risk distance",
            ));
        }

        let entry_count = intent.entries.len();
        let mut legs = Vec::with_capacity(entry_count + 3);

        // Entry legs: the total split evenly across the ladder of prices.
        let per_entry = round_qty(total_quantity / Decimal::from(entry_count as u64));
        if per_entry <= Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "entry quantity rounds to zero when split across {entry_count} prices"
            )));
        }
        for (i, price) in intent.entries.iter().enumerate() {
            legs.push(OrderLeg {
                role: LegRole::Entry,
                side: entry_side,
                kind: OrderKind::Limit,
                price: *price,
                quantity: per_entry,
                reduce_only: false,
                sequence: (i + 1) as u32,
            });
        }

        // Stop-loss: one trigger leg covering the whole position.
        legs.push(OrderLeg {
            role: LegRole::StopLoss,
            side: exit_side,
            kind: OrderKind::MarketTrigger,
            price: intent.stop_loss,
            quantity: total_quantity,
            reduce_only: true,
            sequence: 1,
        });

        // Take-profit legs, TP1 then TP2.
        let levels = [
            (ladder.tp1_price, ladder.tp1_percent),
            (ladder.tp2_price, ladder.tp2_percent),
        ];
        let mut tp_total = Decimal::ZERO;
        for (i, (price, percent)) in levels.iter().enumerate() {
            let quantity = round_qty(total_quantity * *percent / dec!(100));
            if quantity <= Decimal::ZERO {
                return Err(PlanError::invalid(format!(
                    "take-profit {} quantity rounds to zero",
                    i + 1
                )));
            }
            tp_total += quantity;
            legs.push(OrderLeg {
                role: LegRole::TakeProfit,
                side: exit_side,
                kind: OrderKind::Limit,
                price: *price,
                quantity,
                reduce_only: true,
                sequence: (i + 1) as u32,
            });
        }

        // Whatever the ladder doesn't cover stays for a manual exit;
        // it is reported, never turned into a leg.
        let manual_quantity = total_quantity - tp_total;

        debug!(
            symbol = %intent.symbol,
            legs = legs.len(),
            total = %total_quantity,
            manual = %manual_quantity,
            "order plan built"
        );

        Ok(OrderPlan {
            symbol: intent.symbol.clone(),
            status: PlanStatus::Placed,
            skip_reason: None,
            legs,
            total_quantity,
            manual_quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, TradeSide};
    use crate::planning::{PlannerConfig, PositionSizer, TakeProfitPlanner};

    fn builder() -> OrderPlanBuilder {
        OrderPlanBuilder::new()
    }

    fn intent(entries: Vec<Decimal>, stop: Decimal) -> TradeIntent {
        TradeIntent {
            symbol: "BTCUSDT".to_string(),
            side: None,
            entries,
            stop_loss: stop,
            leverage: None,
        }
    }

    fn btc_sizing_and_ladder() -> (PositionSizeResult, TakeProfitLadder) {
        let config = PlannerConfig::default();
        let sizing = PositionSizer::new(config.clone())
            .calculate_position_size(dec!(50000), dec!(49000), dec!(10000), dec!(3), 1)
            .unwrap();
        let ladder = TakeProfitPlanner::new(config)
            .calculate_take_profits(dec!(50000), dec!(49000))
            .unwrap();
        (sizing, ladder)
    }

    #[test]
    fn test_single_entry_plan() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        let plan = builder()
            .build_order_plan(&intent(vec![dec!(50000)], dec!(49000)), &sizing, &ladder, &[], true)
            .unwrap();

        assert_eq!(plan.status, PlanStatus::Placed);
        assert_eq!(plan.legs.len(), 4);

        let entry = &plan.legs[0];
        assert_eq!(entry.role, LegRole::Entry);
        assert_eq!(entry.side, OrderSide::Buy);
        assert_eq!(entry.kind, OrderKind::Limit);
        assert_eq!(entry.quantity, dec!(0.3000));
        assert!(!entry.reduce_only);

        let stop = plan.stop_loss_leg().unwrap();
        assert_eq!(stop.side, OrderSide::Sell);
        assert_eq!(stop.kind, OrderKind::MarketTrigger);
        assert_eq!(stop.price, dec!(49000));
        assert_eq!(stop.quantity, dec!(0.3000));
        assert!(stop.reduce_only);

        let tps: Vec<_> = plan.take_profit_legs().collect();
        assert_eq!(tps[0].quantity, dec!(0.1050));
        assert_eq!(tps[0].price, dec!(50500.00));
        assert_eq!(tps[1].quantity, dec!(0.1500));
        assert_eq!(tps[1].price, dec!(51250.00));
        assert!(tps.iter().all(|l| l.reduce_only && l.side == OrderSide::Sell));

        assert_eq!(plan.manual_quantity, dec!(0.0450));
    }

    #[test]
    fn test_legs_ordered_entries_stop_tps() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        let plan = builder()
            .build_order_plan(
                &intent(vec![dec!(50000), dec!(49800)], dec!(49000)),
                &sizing,
                &ladder,
                &[],
                true,
            )
            .unwrap();

        let roles: Vec<_> = plan.legs.iter().map(|l| l.role).collect();
        assert_eq!(
            roles,
            vec![
                LegRole::Entry,
                LegRole::Entry,
                LegRole::StopLoss,
                LegRole::TakeProfit,
                LegRole::TakeProfit,
            ]
        );
        assert_eq!(plan.legs[0].sequence, 1);
        assert_eq!(plan.legs[1].sequence, 2);
    }

    #[test]
    fn test_existing_orders_skip_plan() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        let existing = vec![OpenOrder {
            order_id: "abc".to_string(),
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            kind: OrderKind::Limit,
            price: dec!(50000),
            quantity: dec!(0.1),
        }];

        let plan = builder()
            .build_order_plan(&intent(vec![dec!(50000)], dec!(49000)), &sizing, &ladder, &existing, true)
            .unwrap();
        assert!(plan.is_skipped());
        assert_eq!(plan.skip_reason, Some(SkipReason::ExistingOrdersFound));
        assert!(plan.legs.is_empty());

        // The guard is advisory: turning it off places anyway
        let forced = builder()
            .build_order_plan(&intent(vec![dec!(50000)], dec!(49000)), &sizing, &ladder, &existing, false)
            .unwrap();
        assert_eq!(forced.status, PlanStatus::Placed);
        assert_eq!(forced.legs.len(), 4);
    }

    #[test]
    fn test_scaled_entries_split_evenly() {
        let config = PlannerConfig::default();
        // A sizing result with quantity 5.0 across three entries
        let sizing = PositionSizeResult {
            tier: RiskTier::Normal,
            risk_percent: dec!(3),
            notional_value: dec!(15000.00),
            quantity: dec!(5.0),
            margin_required: dec!(15000.00),
            max_loss: dec!(300.00),
            leverage: 1,
        };
        let ladder = TakeProfitPlanner::new(config)
            .calculate_take_profits(dec!(3000), dec!(2850))
            .unwrap();

        let plan = builder()
            .build_order_plan(
                &intent(vec![dec!(3000), dec!(2950), dec!(2900)], dec!(2850)),
                &sizing,
                &ladder,
                &[],
                true,
            )
            .unwrap();

        let entries: Vec<_> = plan.entry_legs().collect();
        assert_eq!(entries.len(), 3);
        for leg in &entries {
            assert_eq!(leg.quantity, dec!(1.6667));
        }
        let total: Decimal = entries.iter().map(|l| l.quantity).sum();
        assert!((total - dec!(5.0)).abs() < dec!(0.001));
    }

    #[test]
    fn test_short_plan_flips_sides() {
        let config = PlannerConfig::default();
        let sizing = PositionSizer::new(config.clone())
            .calculate_position_size(dec!(3000), dec!(3100), dec!(10000), dec!(3), 1)
            .unwrap();
        let ladder = TakeProfitPlanner::new(config)
            .calculate_take_profits(dec!(3000), dec!(3100))
            .unwrap();

        let plan = builder()
            .build_order_plan(
                &TradeIntent {
                    symbol: "ETHUSDT".to_string(),
                    side: Some(TradeSide::Short),
                    entries: vec![dec!(3000)],
                    stop_loss: dec!(3100),
                    leverage: None,
                },
                &sizing,
                &ladder,
                &[],
                true,
            )
            .unwrap();

        assert!(plan.entry_legs().all(|l| l.side == OrderSide::Sell));
        assert_eq!(plan.stop_loss_leg().unwrap().side, OrderSide::Buy);
        assert!(plan.take_profit_legs().all(|l| l.side == OrderSide::Buy));
    }

    #[test]
    fn test_stated_side_loses_to_inferred() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        // Stop below entry is a long no matter what the signal claimed
        let plan = builder()
            .build_order_plan(
                &TradeIntent {
                    symbol: "BTCUSDT".to_string(),
                    side: Some(TradeSide::Short),
                    entries: vec![dec!(50000)],
                    stop_loss: dec!(49000),
                    leverage: None,
                },
                &sizing,
                &ladder,
                &[],
                true,
            )
            .unwrap();
        assert!(plan.entry_legs().all(|l| l.side == OrderSide::Buy));
    }

    #[test]
    fn test_zero_rounding_quantity_is_rejected() {
        let config = PlannerConfig::default();
        // Tiny balance: quantity rounds to 0.0000
        let sizing = PositionSizer::new(config.clone())
            .calculate_position_size(dec!(50000), dec!(49000), dec!(0.01), dec!(0.5), 1)
            .unwrap();
        assert_eq!(sizing.quantity, dec!(0.0000));
        let ladder = TakeProfitPlanner::new(config)
            .calculate_take_profits(dec!(50000), dec!(49000))
            .unwrap();

        let err = builder()
            .build_order_plan(&intent(vec![dec!(50000)], dec!(49000)), &sizing, &ladder, &[], true)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidTradeParameters { .. }));
    }

    #[test]
    fn test_empty_entry_ladder_is_rejected() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        let err = builder()
            .build_order_plan(&intent(vec![], dec!(49000)), &sizing, &ladder, &[], true)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidTradeParameters { .. }));
    }

    #[test]
    fn test_manual_remainder_tracks_configured_percent() {
        let (sizing, ladder) = btc_sizing_and_ladder();
        let plan = builder()
            .build_order_plan(&intent(vec![dec!(50000)], dec!(49000)), &sizing, &ladder, &[], true)
            .unwrap();
        let expected = plan.total_quantity * dec!(15) / dec!(100);
        assert!((plan.manual_quantity - expected).abs() < dec!(0.001));
    }
}
