//! Error taxonomy for the planning core.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures the planning core can produce on its own.
///
/// External failures (exchange, config provider) are not wrapped here;
/// they propagate unchanged as `anyhow::Error` through the async pipeline,
/// since the core has no basis for local recovery.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Numeric preconditions violated: non-positive prices or risk,
    /// entry equal to stop-loss, empty entry ladder, or a leg quantity
    /// that rounds to zero.
    #[error("invalid trade parameters: {reason}")]
    InvalidTradeParameters { reason: String },

    /// A balance of zero or less was supplied for sizing.
    #[error("insufficient balance: {balance} USDT")]
    InsufficientBalance { balance: Decimal },
}

impl PlanError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTradeParameters {
            reason: reason.into(),
        }
    }
}
