//! Signal pipeline: sizing, ladder, plan construction, and placement.
//!
//! The planning core is pure; this is the one place with external reads
//! and writes. The idempotency guard inside the builder is check-then-act
//! against the exchange, so the processor serializes the whole
//! fetch → build → place sequence per symbol. Without that lock, two
//! concurrent requests for one symbol could both observe an empty order
//! book and both place.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::PlanError;
use crate::exchange::{ExchangeOrderSink, OrderAck};
use crate::models::{OrderPlan, RiskTier, RiskTierBreakdown, TakeProfitLadder, TradeIntent};
use crate::planning::{OrderPlanBuilder, PlannerConfig, PositionSizer, TakeProfitPlanner};
use crate::settings::{UserConfigProvider, UserSettings};

/// Everything one processed signal produced, for the caller to render.
#[derive(Debug, Clone, Serialize)]
pub struct SignalOutcome {
    pub symbol: String,
    pub settings: UserSettings,
    pub leverage: u32,
    pub ladder: TakeProfitLadder,
    pub tiers: RiskTierBreakdown,
    pub selected_tier: RiskTier,
    pub plan: OrderPlan,
    pub acks: Vec<OrderAck>,
}

/// Drives one trade signal through sizing, ladder, planning, and the
/// exchange sink.
pub struct SignalProcessor {
    sizer: PositionSizer,
    tp_planner: TakeProfitPlanner,
    builder: OrderPlanBuilder,
    provider: Arc<dyn UserConfigProvider>,
    sink: Arc<dyn ExchangeOrderSink>,
    check_existing: bool,
    symbol_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SignalProcessor {
    pub fn new(
        config: PlannerConfig,
        provider: Arc<dyn UserConfigProvider>,
        sink: Arc<dyn ExchangeOrderSink>,
    ) -> Self {
        Self {
            sizer: PositionSizer::new(config.clone()),
            tp_planner: TakeProfitPlanner::new(config),
            builder: OrderPlanBuilder::new(),
            provider,
            sink,
            check_existing: true,
            symbol_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Disable the duplicate-order guard (places even when open orders
    /// exist for the symbol).
    pub fn check_existing(mut self, enabled: bool) -> Self {
        self.check_existing = enabled;
        self
    }

    /// Process one trade intent end to end.
    ///
    /// Sizing uses the tier selected by the caller (the other two tiers
    /// are still computed and returned for display). Exchange failures
    /// propagate unchanged.
    pub async fn process(
        &self,
        intent: &TradeIntent,
        user: Option<&str>,
        tier: RiskTier,
    ) -> Result<SignalOutcome> {
        intent.validate()?;

        let settings = self.provider.user_settings(user);
        if settings.balance <= rust_decimal::Decimal::ZERO {
            return Err(PlanError::InsufficientBalance {
                balance: settings.balance,
            }
            .into());
        }

        let leverage = intent
            .leverage
            .unwrap_or_else(|| self.provider.leverage_for(&intent.symbol));

        // validate() guarantees at least one entry
        let entry = intent
            .reference_entry()
            .ok_or_else(|| PlanError::invalid("at least one entry price is required"))?;

        let ladder = self.tp_planner.calculate_take_profits(entry, intent.stop_loss)?;
        let tiers = self.sizer.calculate_all_modes(
            entry,
            intent.stop_loss,
            settings.balance,
            settings.risk_tolerance,
            leverage,
        )?;
        let sizing = tiers.tier(tier).clone();

        // Hold the symbol's lock across the read and the write so the
        // check-then-act guard cannot race with another request.
        let lock = self.symbol_lock(&intent.symbol).await;
        let _guard = lock.lock().await;

        let existing = self.sink.fetch_open_orders(&intent.symbol).await?;
        let plan = self.builder.build_order_plan(
            intent,
            &sizing,
            &ladder,
            &existing,
            self.check_existing,
        )?;

        let acks = if plan.is_skipped() {
            Vec::new()
        } else {
            self.sink.place_orders(&intent.symbol, &plan.legs).await?
        };

        info!(
            symbol = %intent.symbol,
            status = ?plan.status,
            legs = plan.legs.len(),
            tier = tier.as_str(),
            "signal processed"
        );

        Ok(SignalOutcome {
            symbol: intent.symbol.clone(),
            settings,
            leverage,
            ladder,
            tiers,
            selected_tier: tier,
            plan,
            acks,
        })
    }

    async fn symbol_lock(&self, symbol: &str) -> Arc<Mutex<()>> {
        let mut locks = self.symbol_locks.lock().await;
        locks
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
