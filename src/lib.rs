//! # matching-engine
//!
//! A single-threaded, price-time priority limit order book and matching
//! engine core for one trading instrument.
//!
//! This crate is the core described in its design notes: the ingress
//! transport, the egress sink's delivery mechanism, configuration
//! loading, signal handling, and the thread/event-loop host are all
//! external collaborators a surrounding process supplies. What lives
//! here is the in-memory book — arenas of orders and price levels, a
//! skip-list side tree per side, two open-addressed hash indices, the
//! match loop, and a synchronous event emitter.
//!
//! ## Example
//!
//! ```
//! use matching_engine::{OrderBook, Side};
//! use matching_engine::prelude::*;
//!
//! let mut book = OrderBook::new(0xC0FFEE);
//! let mut sink = NullSink;
//!
//! book.submit_limit(&mut sink, 1, Side::Bid, 100, 10).unwrap();
//! book.submit_limit(&mut sink, 2, Side::Bid, 101, 5).unwrap();
//! assert_eq!(book.best_price(Side::Bid), Some(101));
//!
//! book.submit_execute(&mut sink, 3, Side::Ask, None, 12).unwrap();
//! assert_eq!(book.order_count(), 1);
//! ```
//!
//! ## Non-goals
//!
//! Persistence and recovery, network protocol framing, multi-engine
//! coordination, self-trade prevention, iceberg/hidden orders,
//! stop/conditional orders, fee computation, authentication, and
//! cross-instrument risk checks are all out of scope for this core. A
//! surrounding system that needs any of these builds them around one
//! `OrderBook` per instrument.

mod arena;
mod index_map;
pub mod orderbook;

pub mod prelude;

pub use orderbook::{
    ClosureSink, DepthLevel, EventSink, NullSink, OrderBook, OrderBookError, OrderEvent,
    OrderStatus, RejectReason, Side, TradeEvent, TransportMessage,
};
