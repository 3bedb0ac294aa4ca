//! Order submission, cancellation, and amendment.

use crate::orderbook::book::{fatal_negative_volume, OrderBook};
use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::{EventSink, OrderEvent, OrderStatus, RejectReason};
use crate::orderbook::order::OrderNode;
use crate::orderbook::side::Side;
use tracing::trace;

impl OrderBook {
    /// Places a resting limit order. Maker-only: never matches against
    /// the opposite side, even if it would cross — the caller is
    /// expected to have already routed a potentially-crossing order
    /// through [`Self::submit_execute`] instead.
    ///
    /// Emits a `Created` [`OrderEvent`] on success.
    ///
    /// # Errors
    /// - [`OrderBookError::DuplicateOrderId`] if `order_id` already rests.
    /// - [`OrderBookError::InvalidOrderSize`] if `size == 0`.
    /// - [`OrderBookError::InvalidPrice`] if `price == 0`.
    pub fn submit_limit<S: EventSink>(
        &mut self,
        sink: &mut S,
        order_id: u64,
        side: Side,
        price: u64,
        size: u64,
    ) -> Result<(), OrderBookError> {
        trace!(order_id, ?side, price, size, "submit_limit");
        self.validate_new_order(order_id, price, size, false)?;

        let level_idx = self.find_or_create_level(side, price);
        let order_idx = self
            .orders
            .insert(OrderNode::new(order_id, side, price, size, level_idx));
        self.levels
            .get_mut(level_idx)
            .push_back(&mut self.orders, order_idx);
        self.order_index.put(order_id, order_idx);

        sink.on_order_event(OrderEvent {
            order_id,
            side,
            price,
            status: OrderStatus::Created,
            filled_size: 0,
            cum_filled_size: 0,
            remaining_size: size,
            reject_reason: RejectReason::None,
        });
        Ok(())
    }

    /// Cancels a resting order, removing it from its level's FIFO queue
    /// (and the level itself, if it becomes empty) and emitting a
    /// `Cancelled` [`OrderEvent`].
    ///
    /// # Errors
    /// [`OrderBookError::OrderNotFound`] if `order_id` is not resting.
    pub fn cancel<S: EventSink>(
        &mut self,
        sink: &mut S,
        order_id: u64,
    ) -> Result<(), OrderBookError> {
        trace!(order_id, "cancel");
        let order_idx = self
            .order_index
            .remove(order_id)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;

        let (side, price, size, filled, level_idx) = {
            let node = self.orders.get(order_idx);
            (node.side, node.price, node.size, node.filled, node.level)
        };

        {
            let level = self.levels.get_mut(level_idx);
            level.unlink(&mut self.orders, order_idx);
            level.volume = level
                .volume
                .checked_sub(size)
                .unwrap_or_else(|| fatal_negative_volume());
        }
        self.orders.remove(order_idx);

        if self.levels.get(level_idx).is_empty() {
            self.remove_empty_level(side, level_idx);
        }

        sink.on_order_event(OrderEvent {
            order_id,
            side,
            price,
            status: OrderStatus::Cancelled,
            filled_size: 0,
            cum_filled_size: filled,
            remaining_size: size,
            reject_reason: RejectReason::None,
        });
        Ok(())
    }

    /// Sets a resting order's size in place, adjusting its level's
    /// aggregate volume by `new_size - remaining_size`. Does not change
    /// the order's position in its FIFO queue — size amends, in either
    /// direction, never lose time priority — and emits no event (the
    /// core leaves synthesising an amend notification, if any, to the
    /// surrounding system).
    ///
    /// # Errors
    /// - [`OrderBookError::OrderNotFound`] if `order_id` is not resting.
    /// - [`OrderBookError::InvalidOrderSize`] if `new_size == 0`.
    pub fn amend_size(&mut self, order_id: u64, new_size: u64) -> Result<(), OrderBookError> {
        trace!(order_id, new_size, "amend_size");
        if new_size == 0 {
            return Err(OrderBookError::InvalidOrderSize {
                order_id,
                size: new_size,
            });
        }
        let order_idx = self
            .order_index
            .get(order_id)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;

        let (old_size, level_idx) = {
            let node = self.orders.get(order_idx);
            (node.size, node.level)
        };

        self.orders.get_mut(order_idx).size = new_size;
        let level = self.levels.get_mut(level_idx);
        level.volume = if new_size >= old_size {
            level.volume + (new_size - old_size)
        } else {
            level
                .volume
                .checked_sub(old_size - new_size)
                .unwrap_or_else(|| fatal_negative_volume())
        };
        Ok(())
    }
}
