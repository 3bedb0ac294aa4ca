//! A single-threaded, price-time priority limit order book for one
//! instrument.

mod book;
mod error;
mod events;
mod inspection;
mod level;
mod matching;
mod operations;
mod order;
mod price_tree;
mod side;
mod transport;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use events::{ClosureSink, EventSink, NullSink, OrderEvent, OrderStatus, RejectReason, TradeEvent};
pub use inspection::DepthLevel;
pub use side::Side;
pub use transport::TransportMessage;
