//! User configuration boundary: balance, risk tolerance, and per-symbol
//! leverage.
//!
//! The pipeline treats these as already-resolved numbers; where they are
//! stored (a database, a config service) is outside this crate. The
//! bundled provider keeps everything in memory and seeds its defaults
//! from the environment.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Leverage applied to symbols with no explicit mapping.
pub const DEFAULT_LEVERAGE: u32 = 10;

/// Resolved numeric settings for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Account balance in USDT
    pub balance: Decimal,

    /// Normal-tier risk percentage (e.g. 3 for 3%)
    pub risk_tolerance: Decimal,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            balance: dec!(10000),
            risk_tolerance: dec!(3),
        }
    }
}

/// Supplies resolved user settings and per-symbol leverage.
pub trait UserConfigProvider: Send + Sync {
    /// Settings for a user handle; `None` falls back to the provider's
    /// defaults, as does an unknown handle.
    fn user_settings(&self, handle: Option<&str>) -> UserSettings;

    /// Configured leverage for a symbol, with a conservative default for
    /// anything unmapped.
    fn leverage_for(&self, symbol: &str) -> u32;
}

/// In-memory provider.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    defaults: UserSettings,
    users: HashMap<String, UserSettings>,
    leverage: HashMap<String, u32>,
    default_leverage: u32,
}

impl StaticConfigProvider {
    pub fn new(defaults: UserSettings) -> Self {
        Self {
            defaults,
            users: HashMap::new(),
            leverage: default_leverage_map(),
            default_leverage: DEFAULT_LEVERAGE,
        }
    }

    /// Build defaults from `.env` / process environment:
    /// `TRADEPLAN_BALANCE` and `TRADEPLAN_RISK_TOLERANCE`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut defaults = UserSettings::default();
        if let Some(balance) = env_decimal("TRADEPLAN_BALANCE") {
            defaults.balance = balance;
        }
        if let Some(risk) = env_decimal("TRADEPLAN_RISK_TOLERANCE") {
            defaults.risk_tolerance = risk;
        }
        debug!(
            balance = %defaults.balance,
            risk_tolerance = %defaults.risk_tolerance,
            "loaded default user settings"
        );
        Self::new(defaults)
    }

    pub fn with_user(mut self, handle: impl Into<String>, settings: UserSettings) -> Self {
        self.users.insert(handle.into(), settings);
        self
    }

    pub fn with_leverage(mut self, symbol: impl Into<String>, leverage: u32) -> Self {
        self.leverage.insert(symbol.into(), leverage);
        self
    }

    pub fn leverage_map(&self) -> &HashMap<String, u32> {
        &self.leverage
    }
}

impl UserConfigProvider for StaticConfigProvider {
    fn user_settings(&self, handle: Option<&str>) -> UserSettings {
        handle
            .and_then(|h| self.users.get(h).cloned())
            .unwrap_or_else(|| self.defaults.clone())
    }

    fn leverage_for(&self, symbol: &str) -> u32 {
        if let Some(lev) = self.leverage.get(symbol) {
            return *lev;
        }
        // Leverage is keyed by base asset; accept full pair symbols too.
        for quote in ["USDT", "USDC", "USD", "PERP"] {
            if let Some(base) = symbol.strip_suffix(quote) {
                if let Some(lev) = self.leverage.get(base) {
                    return *lev;
                }
            }
        }
        self.default_leverage
    }
}

/// Liquidity-based leverage tiers for the majors; everything else gets
/// the cautious default.
fn default_leverage_map() -> HashMap<String, u32> {
    HashMap::from([
        ("BTC".to_string(), 100),
        ("ETH".to_string(), 75),
        ("SOL".to_string(), 50),
        ("HYPE".to_string(), 25),
        ("DOGE".to_string(), 20),
        ("SHIB".to_string(), 10),
    ])
}

fn env_decimal(key: &str) -> Option<Decimal> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
