//! Position sizing results for the three risk tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Named risk tier derived from the user's risk tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Conservative,
    Normal,
    Aggressive,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Conservative => "conservative",
            RiskTier::Normal => "normal",
            RiskTier::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sizing outcome for a single risk percentage.
///
/// Invariants (within rounding tolerance):
/// `quantity * entry == notional_value` and
/// `margin_required == notional_value / leverage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizeResult {
    /// Tier this result was computed for
    pub tier: RiskTier,

    /// Risk percentage actually used (after tier clamping)
    pub risk_percent: Decimal,

    /// Position size in USDT, rounded to 2 decimals
    pub notional_value: Decimal,

    /// Number of coins/tokens, rounded to 4 decimals
    pub quantity: Decimal,

    /// Capital committed: notional divided by leverage, 2 decimals
    pub margin_required: Decimal,

    /// Maximum loss if the stop is hit, 2 decimals
    pub max_loss: Decimal,

    /// Leverage applied
    pub leverage: u32,
}

/// Sizing for all three tiers of one trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTierBreakdown {
    pub conservative: PositionSizeResult,
    pub normal: PositionSizeResult,
    pub aggressive: PositionSizeResult,
}

impl RiskTierBreakdown {
    pub fn tier(&self, tier: RiskTier) -> &PositionSizeResult {
        match tier {
            RiskTier::Conservative => &self.conservative,
            RiskTier::Normal => &self.normal,
            RiskTier::Aggressive => &self.aggressive,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionSizeResult> {
        [&self.conservative, &self.normal, &self.aggressive].into_iter()
    }
}
