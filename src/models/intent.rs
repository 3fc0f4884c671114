//! Trade intent: the numeric core of a parsed trade signal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "long",
            TradeSide::Short => "short",
        }
    }

    /// The opposite direction, used for exit legs.
    pub fn opposite(&self) -> TradeSide {
        match self {
            TradeSide::Long => TradeSide::Short,
            TradeSide::Short => TradeSide::Long,
        }
    }
}

/// A trade signal reduced to its numeric content.
///
/// Upstream an LLM-backed extractor turns free text into these fields;
/// this crate only validates the numeric preconditions, never the
/// linguistic ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Trading symbol (e.g. "BTCUSDT")
    pub symbol: String,

    /// Direction as stated by the signal, if any. Direction used for
    /// order legs is always re-derived from the entry/stop relationship.
    #[serde(default)]
    pub side: Option<TradeSide>,

    /// One or more entry prices: a single value or a scaled ladder,
    /// in signal order. The first price is the reference for sizing.
    pub entries: Vec<Decimal>,

    /// Stop-loss price
    pub stop_loss: Decimal,

    /// Leverage override; when absent the per-symbol configured
    /// leverage applies.
    #[serde(default)]
    pub leverage: Option<u32>,
}

impl TradeIntent {
    /// The price used for sizing and the take-profit ladder. Scaled
    /// intents anchor on their leading entry.
    pub fn reference_entry(&self) -> Option<Decimal> {
        self.entries.first().copied()
    }

    /// Check the numeric preconditions shared by every downstream step.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.symbol.trim().is_empty() {
            return Err(PlanError::invalid("symbol must not be empty"));
        }
        if self.entries.is_empty() {
            return Err(PlanError::invalid("at least one entry price is required"));
        }
        if let Some(bad) = self.entries.iter().find(|p| **p <= Decimal::ZERO) {
            return Err(PlanError::invalid(format!(
                "entry price must be positive, got {bad}"
            )));
        }
        if self.stop_loss <= Decimal::ZERO {
            return Err(PlanError::invalid(format!(
                "stop-loss must be positive, got {}",
                self.stop_loss
            )));
        }
        if self.leverage == Some(0) {
            return Err(PlanError::invalid("leverage must be at least 1"));
        }
        Ok(())
    }
}
