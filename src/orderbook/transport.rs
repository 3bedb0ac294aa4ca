//! Convenience dispatch over the four core operations.
//!
//! `TransportMessage` and `OrderBook::apply` are sugar, not a new
//! capability: a host is always free to call `submit_limit`,
//! `submit_execute`, `cancel`, and `amend_size` directly and ignore this
//! module entirely.

use crate::orderbook::book::OrderBook;
use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::EventSink;
use crate::orderbook::side::Side;

/// A single inbound instruction, matching the `created`/`deleted`/
/// `changed` shape a host's wire protocol typically carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMessage {
    /// A new resting limit order (`submit_limit`).
    Created {
        order_id: u64,
        side: Side,
        price: u64,
        size: u64,
    },
    /// A taker execution (`submit_execute`). `limit_price = None` is a
    /// market order.
    Executed {
        order_id: u64,
        side: Side,
        limit_price: Option<u64>,
        size: u64,
    },
    /// Cancels a resting order (`cancel`).
    Deleted { order_id: u64 },
    /// Shrinks a resting order's size (`amend_size`).
    Changed { order_id: u64, new_size: u64 },
}

impl OrderBook {
    /// Dispatches a single [`TransportMessage`] to the matching
    /// operation it represents.
    ///
    /// Returns the unfilled residual for `Executed`/`submit_execute`
    /// (see that method), or `0` for every other message — `Created`,
    /// `Deleted`, and `Changed` never leave a quantity unfilled.
    pub fn apply<S: EventSink>(
        &mut self,
        sink: &mut S,
        msg: TransportMessage,
    ) -> Result<u64, OrderBookError> {
        match msg {
            TransportMessage::Created {
                order_id,
                side,
                price,
                size,
            } => {
                self.submit_limit(sink, order_id, side, price, size)?;
                Ok(0)
            }
            TransportMessage::Executed {
                order_id,
                side,
                limit_price,
                size,
            } => self.submit_execute(sink, order_id, side, limit_price, size),
            TransportMessage::Deleted { order_id } => {
                self.cancel(sink, order_id)?;
                Ok(0)
            }
            TransportMessage::Changed {
                order_id,
                new_size,
            } => {
                self.amend_size(order_id, new_size)?;
                Ok(0)
            }
        }
    }
}
