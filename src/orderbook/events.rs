//! Order and trade events, and the sink that receives them.
//!
//! Mirrors the original C `event_handler`: a pair of callbacks plus an
//! opaque context, invoked synchronously and never allocating on the
//! hot path. `OrderEvent` and `TradeEvent` are small `Copy` structs
//! passed by value.

use crate::orderbook::side::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Cancelled,
    Rejected,
    Filled,
    PartiallyFilled,
    PartiallyFilledCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    None,
    NoLiquidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEvent {
    pub order_id: u64,
    pub side: Side,
    pub price: u64,
    pub status: OrderStatus,
    pub filled_size: u64,
    pub cum_filled_size: u64,
    pub remaining_size: u64,
    pub reject_reason: RejectReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEvent {
    pub price: u64,
    pub size: u64,
    pub taker_side: Side,
}

/// Receives order and trade events emitted by the matching engine.
///
/// Implemented as a trait (rather than the C original's raw function
/// pointers) so a host can close over whatever state it needs; the
/// engine only ever calls these synchronously, in the order matching
/// decisions are made, and never from more than one thread.
pub trait EventSink {
    fn on_order_event(&mut self, event: OrderEvent);
    fn on_trade_event(&mut self, event: TradeEvent);
}

/// An [`EventSink`] that drops every event. Useful for callers that only
/// care about the book's resulting state (e.g. in tests and benches).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_order_event(&mut self, _event: OrderEvent) {}
    fn on_trade_event(&mut self, _event: TradeEvent) {}
}

/// An [`EventSink`] backed by two boxed closures, for callers that want
/// a concrete type without hand-writing a struct + impl.
pub struct ClosureSink<'a> {
    on_order: Box<dyn FnMut(OrderEvent) + 'a>,
    on_trade: Box<dyn FnMut(TradeEvent) + 'a>,
}

impl<'a> ClosureSink<'a> {
    pub fn new(
        on_order: impl FnMut(OrderEvent) + 'a,
        on_trade: impl FnMut(TradeEvent) + 'a,
    ) -> Self {
        ClosureSink {
            on_order: Box::new(on_order),
            on_trade: Box::new(on_trade),
        }
    }
}

impl EventSink for ClosureSink<'_> {
    fn on_order_event(&mut self, event: OrderEvent) {
        (self.on_order)(event);
    }
    fn on_trade_event(&mut self, event: TradeEvent) {
        (self.on_trade)(event);
    }
}
