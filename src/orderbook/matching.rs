//! Taker execution: walks the opposite side and consumes resting
//! liquidity in strict price-then-time order.

use crate::orderbook::book::{fatal_crossed_book, fatal_negative_volume, OrderBook};
use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::{EventSink, OrderEvent, OrderStatus, RejectReason, TradeEvent};
use crate::orderbook::side::Side;
use tracing::trace;

impl OrderBook {
    /// Executes a taker order against resting liquidity on the opposite
    /// side. Never rests: whatever is not filled (because the opposite
    /// side ran dry, or because `limit_price` stopped crossing) is
    /// simply not filled, it is not added to the book.
    ///
    /// `limit_price = None` means a market order: match until `size` is
    /// exhausted or the opposite side is empty, regardless of price.
    /// `limit_price = Some(p)` only matches against resting orders that
    /// cross `p` (asks at or below `p` when buying, bids at or above
    /// `p` when selling).
    ///
    /// Within a single price-level fill, the maker's [`OrderEvent`] is
    /// emitted before the taker's, and the [`TradeEvent`] follows both —
    /// this ordering holds for every fill step, and across separate
    /// calls events are totally ordered by invocation order.
    ///
    /// Returns the unfilled residual: `size` itself when no liquidity was
    /// available at all, the leftover quantity when the opposite side (or
    /// `limit_price`) ran dry before `size` was exhausted, and `0` when
    /// fully filled.
    ///
    /// # Errors
    /// - [`OrderBookError::DuplicateOrderId`] if `order_id` already rests
    ///   (it should never be resting, since takers never rest, but a
    ///   caller could reuse an id by mistake).
    /// - [`OrderBookError::InvalidOrderSize`] if `size == 0`.
    pub fn submit_execute<S: EventSink>(
        &mut self,
        sink: &mut S,
        order_id: u64,
        side: Side,
        limit_price: Option<u64>,
        size: u64,
    ) -> Result<u64, OrderBookError> {
        trace!(order_id, ?side, ?limit_price, size, "submit_execute");
        self.validate_new_order(order_id, limit_price.unwrap_or(0), size, true)?;

        let opposite = side.opposite();
        let mut remaining = size;
        let mut cum_filled: u64 = 0;

        'levels: loop {
            if remaining == 0 {
                break;
            }
            let Some(level_idx) = (match side {
                Side::Bid => self.ask_tree.min(),
                Side::Ask => self.bid_tree.max(),
            }) else {
                break;
            };
            let level_price = self.levels.get(level_idx).price;
            if let Some(limit) = limit_price {
                let crosses = match side {
                    Side::Bid => level_price <= limit,
                    Side::Ask => level_price >= limit,
                };
                if !crosses {
                    break;
                }
            }

            loop {
                if remaining == 0 {
                    break 'levels;
                }
                let Some(maker_idx) = self.levels.get(level_idx).head else {
                    break;
                };
                let (maker_order_id, maker_size) = {
                    let node = self.orders.get(maker_idx);
                    (node.order_id, node.size)
                };
                let fill = remaining.min(maker_size);
                let maker_remaining = maker_size - fill;

                {
                    let level = self.levels.get_mut(level_idx);
                    level.volume = level
                        .volume
                        .checked_sub(fill)
                        .unwrap_or_else(|| fatal_negative_volume());
                }

                let maker_cum_filled = {
                    let node = self.orders.get_mut(maker_idx);
                    node.filled += fill;
                    node.filled
                };

                if maker_remaining == 0 {
                    self.levels
                        .get_mut(level_idx)
                        .unlink(&mut self.orders, maker_idx);
                    self.order_index.remove(maker_order_id);
                    self.orders.remove(maker_idx);
                } else {
                    self.orders.get_mut(maker_idx).size = maker_remaining;
                }

                remaining -= fill;
                cum_filled += fill;

                sink.on_order_event(OrderEvent {
                    order_id: maker_order_id,
                    side: opposite,
                    price: level_price,
                    status: if maker_remaining == 0 {
                        OrderStatus::Filled
                    } else {
                        OrderStatus::PartiallyFilled
                    },
                    filled_size: fill,
                    cum_filled_size: maker_cum_filled,
                    remaining_size: maker_remaining,
                    reject_reason: RejectReason::None,
                });

                let taker_status = if remaining == 0 {
                    OrderStatus::Filled
                } else {
                    OrderStatus::PartiallyFilled
                };
                sink.on_order_event(OrderEvent {
                    order_id,
                    side,
                    price: level_price,
                    status: taker_status,
                    filled_size: fill,
                    cum_filled_size: cum_filled,
                    remaining_size: remaining,
                    reject_reason: RejectReason::None,
                });

                sink.on_trade_event(TradeEvent {
                    price: level_price,
                    size: fill,
                    taker_side: side,
                });
            }

            if self.levels.get(level_idx).is_empty() {
                self.remove_empty_level(opposite, level_idx);
            }
        }

        if cum_filled == 0 {
            sink.on_order_event(OrderEvent {
                order_id,
                side,
                price: limit_price.unwrap_or(0),
                status: OrderStatus::Rejected,
                filled_size: 0,
                cum_filled_size: 0,
                remaining_size: size,
                reject_reason: RejectReason::NoLiquidity,
            });
        } else if remaining > 0 {
            sink.on_order_event(OrderEvent {
                order_id,
                side,
                price: limit_price.unwrap_or(0),
                status: OrderStatus::PartiallyFilledCancelled,
                filled_size: 0,
                cum_filled_size: cum_filled,
                remaining_size: remaining,
                reject_reason: RejectReason::None,
            });
        }

        if let (Some(bid), Some(ask)) = (self.best_price(Side::Bid), self.best_price(Side::Ask)) {
            if bid >= ask {
                fatal_crossed_book();
            }
        }

        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::events::NullSink;

    fn book_with_resting_ask(price: u64, size: u64) -> OrderBook {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 100, Side::Ask, price, size)
            .unwrap();
        book
    }

    #[test]
    fn market_buy_fully_consumes_single_maker() {
        let mut book = book_with_resting_ask(100, 10);
        let mut sink = NullSink;
        let unfilled = book
            .submit_execute(&mut sink, 1, Side::Bid, None, 10)
            .unwrap();
        assert_eq!(unfilled, 0, "fully filled execute must return 0");
        assert_eq!(book.order_info(100), None);
        assert_eq!(book.level_count(), 0);
    }

    #[test]
    fn market_buy_partially_fills_larger_maker() {
        let mut book = book_with_resting_ask(100, 10);
        let mut sink = NullSink;
        book.submit_execute(&mut sink, 1, Side::Bid, None, 4)
            .unwrap();
        assert_eq!(book.order_info(100), Some((Side::Ask, 100, 6)));
        assert_eq!(book.volume_at(Side::Ask, 100), 6);
    }

    #[test]
    fn market_buy_walks_multiple_price_levels_in_price_order() {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 1, Side::Ask, 102, 5).unwrap();
        book.submit_limit(&mut sink, 2, Side::Ask, 101, 5).unwrap();
        book.submit_limit(&mut sink, 3, Side::Ask, 100, 5).unwrap();

        let mut trades = Vec::new();
        let mut sink = crate::orderbook::events::ClosureSink::new(
            |_e| {},
            |e: TradeEvent| trades.push(e),
        );
        book.submit_execute(&mut sink, 99, Side::Bid, None, 12)
            .unwrap();
        let prices: Vec<u64> = trades.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![100, 101, 102]);
    }

    #[test]
    fn limit_execute_stops_at_price_limit() {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 1, Side::Ask, 100, 5).unwrap();
        book.submit_limit(&mut sink, 2, Side::Ask, 110, 5).unwrap();
        book.submit_execute(&mut sink, 99, Side::Bid, Some(105), 10)
            .unwrap();
        // only the 100 level should have matched; 110 stays resting
        assert_eq!(book.order_info(2), Some((Side::Ask, 110, 5)));
        assert_eq!(book.order_info(1), None);
    }

    #[test]
    fn no_liquidity_rejects_taker() {
        let mut book = OrderBook::new(1);
        let mut statuses = Vec::new();
        let mut sink = crate::orderbook::events::ClosureSink::new(
            |e: OrderEvent| statuses.push(e.status),
            |_e| {},
        );
        let unfilled = book
            .submit_execute(&mut sink, 1, Side::Bid, None, 10)
            .unwrap();
        assert_eq!(unfilled, 10, "no-liquidity execute must return the full size");
        assert_eq!(statuses, vec![OrderStatus::Rejected]);
    }

    #[test]
    fn exhausted_liquidity_emits_partially_filled_cancelled() {
        let mut book = book_with_resting_ask(100, 4);
        let mut statuses = Vec::new();
        let mut sink = crate::orderbook::events::ClosureSink::new(
            |e: OrderEvent| statuses.push((e.order_id, e.status)),
            |_e| {},
        );
        let unfilled = book
            .submit_execute(&mut sink, 1, Side::Bid, None, 10)
            .unwrap();
        assert_eq!(unfilled, 6, "partially filled execute must return the residual");
        assert_eq!(
            statuses.last(),
            Some(&(1, OrderStatus::PartiallyFilledCancelled))
        );
    }

    #[test]
    fn maker_event_precedes_taker_event_precedes_trade_event() {
        let mut book = book_with_resting_ask(100, 10);
        #[derive(Debug, PartialEq)]
        enum Seen {
            Order(u64),
            Trade,
        }
        let mut log = Vec::new();
        let mut sink = crate::orderbook::events::ClosureSink::new(
            |e: OrderEvent| log.push(Seen::Order(e.order_id)),
            |_e| log.push(Seen::Trade),
        );
        book.submit_execute(&mut sink, 1, Side::Bid, None, 10)
            .unwrap();
        assert_eq!(log, vec![Seen::Order(100), Seen::Order(1), Seen::Trade]);
    }
}
