//! Convenience re-export of the crate's public surface.
//!
//! ```
//! use matching_engine::prelude::*;
//! ```

pub use crate::orderbook::{
    ClosureSink, DepthLevel, EventSink, NullSink, OrderBook, OrderBookError, OrderEvent,
    OrderStatus, RejectReason, Side, TradeEvent, TransportMessage,
};
