//! Core order book: arenas, indices, and the two side trees.

use crate::arena::Arena;
use crate::index_map::IndexMap;
use crate::orderbook::error::OrderBookError;
use crate::orderbook::level::LevelNode;
use crate::orderbook::order::{LevelIndex, OrderIndex, OrderNode};
use crate::orderbook::price_tree::PriceTree;
use crate::orderbook::side::Side;

/// A single-instrument, price-time priority limit order book.
///
/// Holds no `Arc`, `Mutex`, or atomics: every cross-reference is an
/// arena index, and every map is the crate's own open-addressed
/// [`IndexMap`]. A host embedding this crate shards one `OrderBook` per
/// instrument and owns any cross-thread handoff itself.
pub struct OrderBook {
    pub(super) orders: Arena<OrderNode>,
    pub(super) levels: Arena<LevelNode>,

    /// order_id -> OrderIndex, for `cancel`/`amend_size`.
    pub(super) order_index: IndexMap<OrderIndex>,
    /// price -> LevelIndex, one per side, for O(1) find-or-create on insert.
    pub(super) bid_levels: IndexMap<LevelIndex>,
    pub(super) ask_levels: IndexMap<LevelIndex>,

    pub(super) bid_tree: PriceTree,
    pub(super) ask_tree: PriceTree,
}

impl OrderBook {
    /// Creates an empty order book.
    ///
    /// `seed` drives the skip lists' coin-flip height selection; pass a
    /// fixed value for deterministic, reproducible topologies (as the
    /// golden-file replay tests do) or a value derived from entropy for
    /// production use.
    pub fn new(seed: u64) -> Self {
        tracing::trace!(seed, "creating order book");
        OrderBook {
            orders: Arena::new(),
            levels: Arena::new(),
            order_index: IndexMap::new(),
            bid_levels: IndexMap::new(),
            ask_levels: IndexMap::new(),
            bid_tree: PriceTree::new(seed),
            ask_tree: PriceTree::new(seed.wrapping_add(0x9e3779b97f4a7c15)),
        }
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub(super) fn tree(&self, side: Side) -> &PriceTree {
        match side {
            Side::Bid => &self.bid_tree,
            Side::Ask => &self.ask_tree,
        }
    }

    pub(super) fn tree_mut(&mut self, side: Side) -> &mut PriceTree {
        match side {
            Side::Bid => &mut self.bid_tree,
            Side::Ask => &mut self.ask_tree,
        }
    }

    pub(super) fn level_index(&self, side: Side) -> &IndexMap<LevelIndex> {
        match side {
            Side::Bid => &self.bid_levels,
            Side::Ask => &self.ask_levels,
        }
    }

    pub(super) fn level_index_mut(&mut self, side: Side) -> &mut IndexMap<LevelIndex> {
        match side {
            Side::Bid => &mut self.bid_levels,
            Side::Ask => &mut self.ask_levels,
        }
    }

    /// The best (highest bid / lowest ask) resting price on `side`, if any.
    pub fn best_price(&self, side: Side) -> Option<u64> {
        let level_idx = match side {
            Side::Bid => self.bid_tree.max(),
            Side::Ask => self.ask_tree.min(),
        }?;
        Some(self.levels.get(level_idx).price)
    }

    /// Aggregate resting volume at `price` on `side`, or `0` if no level
    /// exists there.
    pub fn volume_at(&self, side: Side, price: u64) -> u64 {
        match self.level_index(side).get(price) {
            Some(idx) => self.levels.get(idx).volume,
            None => 0,
        }
    }

    /// Returns `(side, price, size)` for a resting order, or `None` if
    /// `order_id` is not currently resting.
    pub fn order_info(&self, order_id: u64) -> Option<(Side, u64, u64)> {
        let idx = self.order_index.get(order_id)?;
        let node = self.orders.get(idx);
        Some((node.side, node.price, node.size))
    }

    /// Finds the level for `price` on `side`, creating an empty one and
    /// threading it into the side tree if it does not yet exist.
    pub(super) fn find_or_create_level(&mut self, side: Side, price: u64) -> LevelIndex {
        if let Some(idx) = self.level_index(side).get(price) {
            return idx;
        }
        let level_idx = self.levels.insert(LevelNode::new(price));
        self.tree_mut(side).insert(&mut self.levels, level_idx);
        self.level_index_mut(side).put(price, level_idx);
        level_idx
    }

    /// Removes an empty level from both the index and the tree. Callers
    /// must only call this once the level's FIFO queue is empty.
    pub(super) fn remove_empty_level(&mut self, side: Side, level_idx: LevelIndex) {
        let price = self.levels.get(level_idx).price;
        if !self.levels.get(level_idx).is_empty() {
            fatal_non_empty_level_removed();
        }
        self.level_index_mut(side).remove(price);
        let removed = self.tree_mut(side).remove(&mut self.levels, price);
        if removed.is_none() {
            fatal_level_missing_from_tree();
        }
        self.levels.remove(level_idx);
    }

    /// Validates a submitted size and price, returning the matching
    /// error variant without mutating any state.
    pub(super) fn validate_new_order(
        &self,
        order_id: u64,
        price: u64,
        size: u64,
        market: bool,
    ) -> Result<(), OrderBookError> {
        if self.order_index.contains_key(order_id) {
            return Err(OrderBookError::DuplicateOrderId(order_id));
        }
        if size == 0 {
            return Err(OrderBookError::InvalidOrderSize { order_id, size });
        }
        if !market && price == 0 {
            return Err(OrderBookError::InvalidPrice { order_id });
        }
        Ok(())
    }
}

#[cold]
pub(super) fn fatal_non_empty_level_removed() -> ! {
    tracing::error!("orderbook invariant violated: removed a price level with resting orders");
    panic!("attempted to remove a non-empty price level");
}

#[cold]
pub(super) fn fatal_level_missing_from_tree() -> ! {
    tracing::error!("orderbook invariant violated: level present in index but absent from tree");
    panic!("price level missing from side tree");
}

#[cold]
pub(super) fn fatal_negative_volume() -> ! {
    tracing::error!("orderbook invariant violated: level volume underflowed");
    panic!("price level volume went negative");
}

#[cold]
pub(super) fn fatal_crossed_book() -> ! {
    tracing::error!("orderbook invariant violated: best bid >= best ask after a matching step");
    panic!("book crossed after matching");
}
