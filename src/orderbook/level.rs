//! Price level: an aggregate volume plus a FIFO queue of orders, and the
//! intrusive skip-list linkage used by [`super::price_tree::PriceTree`].

use crate::arena::Arena;
use crate::orderbook::order::{LevelIndex, OrderIndex, OrderNode};

/// Maximum skip-list node height. `2^MAX_HEIGHT` levels comfortably
/// covers any realistic number of distinct resting prices; height is
/// chosen per-node by coin flips in [`super::price_tree::PriceTree`].
pub const MAX_HEIGHT: usize = 16;

pub struct LevelNode {
    pub price: u64,
    pub volume: u64,
    pub order_count: u32,
    pub head: Option<OrderIndex>,
    pub tail: Option<OrderIndex>,

    pub(super) forward: [Option<LevelIndex>; MAX_HEIGHT],
    pub(super) level0_prev: Option<LevelIndex>,
    pub(super) node_height: usize,
}

impl LevelNode {
    pub fn new(price: u64) -> Self {
        LevelNode {
            price,
            volume: 0,
            order_count: 0,
            head: None,
            tail: None,
            forward: [None; MAX_HEIGHT],
            level0_prev: None,
            node_height: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends `order` to the tail of this level's FIFO queue and
    /// updates aggregate volume/count.
    pub fn push_back(&mut self, orders: &mut Arena<OrderNode>, order_idx: OrderIndex) {
        let size = orders.get(order_idx).size;
        let prev_tail = self.tail;
        orders.get_mut(order_idx).prev = prev_tail;
        orders.get_mut(order_idx).next = None;
        match prev_tail {
            Some(t) => orders.get_mut(t).next = Some(order_idx),
            None => self.head = Some(order_idx),
        }
        self.tail = Some(order_idx);
        self.volume += size;
        self.order_count += 1;
    }

    /// Splices `order_idx` out of this level's FIFO queue. Does not
    /// adjust volume (the caller may be removing for an amend that
    /// re-adds, or for a cancel that must not double count).
    pub fn unlink(&mut self, orders: &mut Arena<OrderNode>, order_idx: OrderIndex) {
        let (prev, next) = {
            let node = orders.get(order_idx);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => orders.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => orders.get_mut(n).prev = prev,
            None => self.tail = prev,
        }
        self.order_count -= 1;
    }
}
