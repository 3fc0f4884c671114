//! Exchange boundary: open-order reads and order placement writes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LegRole, OrderKind, OrderLeg, OrderSide};

/// An order already resting on the exchange, as reported by the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Identifier assigned by the exchange for one placed leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
    pub role: LegRole,
    pub sequence: u32,
    pub placed_at: DateTime<Utc>,
}

/// Where finished order plans go, and where the idempotency guard reads
/// existing orders from.
///
/// Selected once at startup; business logic never branches on which
/// implementation it holds. The bundled [`NullSink`](super::NullSink)
/// logs and acknowledges without touching any venue; a live
/// implementation would sign and submit to the exchange here.
#[async_trait]
pub trait ExchangeOrderSink: Send + Sync {
    /// Open orders for a symbol. The plan builder treats a non-empty
    /// result as "already placed" and skips.
    async fn fetch_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>>;

    /// Submit the legs of a plan, in order. Returns one ack per leg.
    async fn place_orders(&self, symbol: &str, legs: &[OrderLeg]) -> Result<Vec<OrderAck>>;
}
