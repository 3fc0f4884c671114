//! Exchange connectivity boundary.

mod null;
mod sink;

pub use null::NullSink;
pub use sink::{ExchangeOrderSink, OpenOrder, OrderAck};
