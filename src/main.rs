//! Trade Signal Planner
//!
//! Turns trade signals into executable order plans sized to the user's
//! risk tolerance: tiered position sizing, a fixed-ratio take-profit
//! ladder, and multi-leg order construction with a duplicate guard.

mod error;
mod exchange;
mod models;
mod pipeline;
mod planning;
mod settings;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::exchange::NullSink;
use crate::models::{LegRole, OrderKind, RiskTier, TradeIntent};
use crate::pipeline::SignalProcessor;
use crate::planning::{PlannerConfig, PositionSizer, TakeProfitPlanner};
use crate::settings::{StaticConfigProvider, UserConfigProvider};

/// Trade signal planner CLI.
#[derive(Parser)]
#[command(name = "tradeplan")]
#[command(about = "Size trade signals and build multi-leg order plans", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Position sizing for all three risk tiers
    Size {
        /// Entry price
        #[arg(short, long)]
        entry: Decimal,

        /// Stop-loss price
        #[arg(short, long)]
        stop_loss: Decimal,

        /// Account balance in USDT
        #[arg(short, long, default_value = "10000")]
        balance: Decimal,

        /// Normal-tier risk percentage
        #[arg(short, long, default_value = "3")]
        risk: Decimal,

        /// Leverage
        #[arg(long, default_value = "1")]
        leverage: u32,

        /// Symbol, for display only
        #[arg(long, default_value = "BTC")]
        symbol: String,
    },

    /// Take-profit ladder for an entry/stop pair
    Ladder {
        /// Entry price
        #[arg(short, long)]
        entry: Decimal,

        /// Stop-loss price
        #[arg(short, long)]
        stop_loss: Decimal,
    },

    /// Build and place a full order plan (null sink: logged, not sent)
    Plan {
        /// Trading symbol (e.g. BTCUSDT)
        symbol: String,

        /// Entry price(s); repeat or comma-separate for a scaled ladder
        #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
        entry: Vec<Decimal>,

        /// Stop-loss price
        #[arg(short, long)]
        stop_loss: Decimal,

        /// Account balance in USDT (default from env/.env, else 10000)
        #[arg(short, long)]
        balance: Option<Decimal>,

        /// Normal-tier risk percentage (default from env/.env, else 3)
        #[arg(short, long)]
        risk: Option<Decimal>,

        /// Leverage override; defaults to the per-symbol map
        #[arg(long)]
        leverage: Option<u32>,

        /// Risk tier to place (conservative, normal, aggressive)
        #[arg(short, long, default_value = "normal")]
        tier: String,

        /// Place even if open orders exist for the symbol
        #[arg(long)]
        force: bool,

        /// Emit the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show effective planner configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = PlannerConfig::default();

    match cli.command {
        Commands::Size {
            entry,
            stop_loss,
            balance,
            risk,
            leverage,
            symbol,
        } => {
            let sizer = PositionSizer::new(config);
            let modes = sizer.calculate_all_modes(entry, stop_loss, balance, risk, leverage)?;

            println!("\nPosition Sizing Options for {symbol}:");
            for result in modes.iter() {
                println!("\n{} ({}%):", capitalize(result.tier.as_str()), result.risk_percent);
                println!("  Position:  ${} USDT", result.notional_value);
                println!("  Quantity:  {} {}", result.quantity, symbol);
                println!("  Margin:    ${}", result.margin_required);
                println!("  Max Loss:  ${}", result.max_loss);
            }
            println!();
        }

        Commands::Ladder { entry, stop_loss } => {
            let planner = TakeProfitPlanner::new(config);
            let ladder = planner.calculate_take_profits(entry, stop_loss)?;

            println!("\nTake-Profit Ladder ({}):", ladder.direction.as_str());
            println!("  Risk Distance: {}", ladder.risk_distance);
            println!(
                "  TP1: {} ({}% of position, {}R)",
                ladder.tp1_price, ladder.tp1_percent, ladder.rr_tp1
            );
            println!(
                "  TP2: {} ({}% of position, {}R)",
                ladder.tp2_price, ladder.tp2_percent, ladder.rr_tp2
            );
            println!("  Manual exit: {}% of position\n", ladder.manual_percent);
        }

        Commands::Plan {
            symbol,
            entry,
            stop_loss,
            balance,
            risk,
            leverage,
            tier,
            force,
            json,
        } => {
            let tier = parse_tier(&tier)?;

            // CLI flags override the environment defaults
            let env_provider = StaticConfigProvider::from_env();
            let mut defaults = env_provider.user_settings(None);
            if let Some(balance) = balance {
                defaults.balance = balance;
            }
            if let Some(risk) = risk {
                defaults.risk_tolerance = risk;
            }
            let provider = Arc::new(StaticConfigProvider::new(defaults));

            let intent = TradeIntent {
                symbol,
                side: None,
                entries: entry,
                stop_loss,
                leverage,
            };

            let processor =
                SignalProcessor::new(config, provider, Arc::new(NullSink::new()))
                    .check_existing(!force);
            let outcome = processor.process(&intent, None, tier).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            println!("\n=== Order Plan: {} ===", outcome.symbol);
            println!("Direction: {}", outcome.ladder.direction.as_str());
            println!("Tier:      {} ({}%)", outcome.selected_tier, outcome.tiers.tier(tier).risk_percent);
            println!("Leverage:  {}x", outcome.leverage);
            println!("Status:    {:?}", outcome.plan.status);
            if let Some(reason) = outcome.plan.skip_reason {
                println!("Reason:    {}", reason.as_str());
                println!();
                return Ok(());
            }

            println!("\n{:<14} {:<6} {:<15} {:>12} {:>14}", "ROLE", "SIDE", "KIND", "QTY", "PRICE");
            println!("{}", "-".repeat(65));
            for leg in &outcome.plan.legs {
                let role = match leg.role {
                    LegRole::Entry => format!("entry #{}", leg.sequence),
                    LegRole::StopLoss => "stop-loss".to_string(),
                    LegRole::TakeProfit => format!("take-profit {}", leg.sequence),
                };
                let kind = match leg.kind {
                    OrderKind::Limit => "limit",
                    OrderKind::MarketTrigger => "market-trigger",
                };
                println!(
                    "{:<14} {:<6} {:<15} {:>12} {:>14}",
                    role,
                    leg.side.as_str(),
                    kind,
                    leg.quantity.to_string(),
                    leg.price.to_string()
                );
            }
            println!(
                "\nManual exit remainder: {} ({}% of {})",
                outcome.plan.manual_quantity,
                outcome.ladder.manual_percent,
                outcome.plan.total_quantity
            );
            println!("Orders acknowledged: {}\n", outcome.acks.len());
        }

        Commands::Config => {
            let provider = StaticConfigProvider::from_env();
            let defaults = provider.user_settings(None);

            println!("\n=== Planner Configuration ===\n");
            println!("Take-Profit Ladder:");
            println!("  TP1:          {}R, {}% of position", config.rr_tp1, config.tp1_percent);
            println!("  TP2:          {}R, {}% of position", config.rr_tp2, config.tp2_percent);
            println!("  Manual exit:  {}%", config.manual_percent);

            println!("\nRisk Tiers:");
            println!("  Spread:       +/-{} percentage points", config.tier_spread);
            println!("  Clamp range:  [{}%, {}%]", config.min_risk_percent, config.max_risk_percent);

            println!("\nDefault User Settings:");
            println!("  Balance:        ${} USDT", defaults.balance);
            println!("  Risk Tolerance: {}%", defaults.risk_tolerance);

            println!("\nLeverage Map (default {}x):", settings::DEFAULT_LEVERAGE);
            let mut entries: Vec<_> = provider.leverage_map().iter().collect();
            entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (symbol, leverage) in entries {
                println!("  {:<8} {}x", symbol, leverage);
            }
            println!();
        }
    }

    Ok(())
}

fn parse_tier(s: &str) -> Result<RiskTier> {
    match s.to_lowercase().as_str() {
        "conservative" => Ok(RiskTier::Conservative),
        "normal" => Ok(RiskTier::Normal),
        "aggressive" => Ok(RiskTier::Aggressive),
        other => Err(anyhow!(
            "unknown tier '{other}' (expected conservative, normal, or aggressive)"
        )),
    }
}

/// Capitalize the first letter for display.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
