//! Price-ordered skip list over [`LevelNode`]s.
//!
//! Always stored in ascending price order regardless of side; the
//! matching engine picks `min()` (best ask) or `max()` (best bid). The
//! bottom level is additionally doubly linked (`level0_prev`) so `max()`
//! and reverse traversal for bid-side `top_n` are O(1)/O(n) without a
//! second pass from the head.
//!
//! This replaces an unbalanced binary search tree: height is chosen by
//! coin flips at insertion time, so no adversarial insertion order can
//! degrade it to a list the way a naive BST degrades on monotonic
//! insertion.

use crate::arena::Arena;
use crate::orderbook::level::{LevelNode, MAX_HEIGHT};
use crate::orderbook::order::LevelIndex;

pub struct PriceTree {
    head: [Option<LevelIndex>; MAX_HEIGHT],
    height: usize,
    len: usize,
    tail: Option<LevelIndex>,
    rng: u64,
}

impl PriceTree {
    pub fn new(seed: u64) -> Self {
        PriceTree {
            head: [None; MAX_HEIGHT],
            height: 1,
            len: 0,
            tail: None,
            rng: seed | 1, // xorshift requires a nonzero state
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn min(&self) -> Option<LevelIndex> {
        self.head[0]
    }

    pub fn max(&self) -> Option<LevelIndex> {
        self.tail
    }

    /// Finds the level node at exactly `price`, if any, by tree search.
    /// The engine normally avoids this path by consulting the
    /// price-level `IndexMap` first; this exists for completeness and
    /// for tests.
    pub fn find(&self, arena: &Arena<LevelNode>, price: u64) -> Option<LevelIndex> {
        let mut cursor: Option<LevelIndex> = None;
        for lvl in (0..self.height).rev() {
            loop {
                let next = self.forward_of(arena, cursor, lvl);
                match next {
                    Some(idx) if arena.get(idx).price < price => cursor = Some(idx),
                    _ => break,
                }
            }
        }
        let candidate = self.forward_of(arena, cursor, 0);
        match candidate {
            Some(idx) if arena.get(idx).price == price => Some(idx),
            _ => None,
        }
    }

    fn forward_of(
        &self,
        arena: &Arena<LevelNode>,
        cursor: Option<LevelIndex>,
        lvl: usize,
    ) -> Option<LevelIndex> {
        match cursor {
            None => self.head[lvl],
            Some(idx) => arena.get(idx).forward[lvl],
        }
    }

    /// Inserts a level already allocated at `new_idx` (with `arena.get(new_idx).price`
    /// already set) into its sorted position.
    ///
    /// # Panics
    /// Panics (contract violation) if a level at the same price already
    /// exists; callers must consult the price-level index first.
    pub fn insert(&mut self, arena: &mut Arena<LevelNode>, new_idx: LevelIndex) {
        let price = arena.get(new_idx).price;
        let mut update: [Option<LevelIndex>; MAX_HEIGHT] = [None; MAX_HEIGHT];
        let mut cursor: Option<LevelIndex> = None;
        for lvl in (0..self.height).rev() {
            loop {
                let next = self.forward_of(arena, cursor, lvl);
                match next {
                    Some(idx) if arena.get(idx).price < price => cursor = Some(idx),
                    _ => break,
                }
            }
            update[lvl] = cursor;
        }

        if let Some(candidate) = self.forward_of(arena, cursor, 0) {
            if arena.get(candidate).price == price {
                fatal_duplicate_level();
            }
        }

        let node_height = self.random_height();
        if node_height > self.height {
            self.height = node_height;
        }
        arena.get_mut(new_idx).node_height = node_height;

        for lvl in 0..node_height {
            let pred = update[lvl];
            let next = self.forward_of(arena, pred, lvl);
            arena.get_mut(new_idx).forward[lvl] = next;
            match pred {
                None => self.head[lvl] = Some(new_idx),
                Some(idx) => arena.get_mut(idx).forward[lvl] = Some(new_idx),
            }
        }

        let prev0 = update[0];
        arena.get_mut(new_idx).level0_prev = prev0;
        match arena.get(new_idx).forward[0] {
            Some(next_idx) => arena.get_mut(next_idx).level0_prev = Some(new_idx),
            None => self.tail = Some(new_idx),
        }
        self.len += 1;
    }

    /// Removes the level at `price`, returning its index for the caller
    /// to free from the arena. Returns `None` if no such level exists.
    pub fn remove(&mut self, arena: &mut Arena<LevelNode>, price: u64) -> Option<LevelIndex> {
        let mut update: [Option<LevelIndex>; MAX_HEIGHT] = [None; MAX_HEIGHT];
        let mut cursor: Option<LevelIndex> = None;
        for lvl in (0..self.height).rev() {
            loop {
                let next = self.forward_of(arena, cursor, lvl);
                match next {
                    Some(idx) if arena.get(idx).price < price => cursor = Some(idx),
                    _ => break,
                }
            }
            update[lvl] = cursor;
        }

        let target = match self.forward_of(arena, cursor, 0) {
            Some(idx) if arena.get(idx).price == price => idx,
            _ => return None,
        };

        let node_height = arena.get(target).node_height;
        for lvl in 0..node_height {
            let next = arena.get(target).forward[lvl];
            match update[lvl] {
                None => self.head[lvl] = next,
                Some(p) => arena.get_mut(p).forward[lvl] = next,
            }
        }

        let prev0 = arena.get(target).level0_prev;
        let next0 = arena.get(target).forward[0];
        match next0 {
            Some(n) => arena.get_mut(n).level0_prev = prev0,
            None => self.tail = prev0,
        }

        while self.height > 1 && self.head[self.height - 1].is_none() {
            self.height -= 1;
        }
        self.len -= 1;
        Some(target)
    }

    /// Forward price+volume pairs starting at `min()`, ascending, capped at `n`.
    pub fn top_n_ascending(&self, arena: &Arena<LevelNode>, n: usize) -> Vec<(u64, u64)> {
        let mut out = Vec::with_capacity(n.min(self.len));
        let mut cursor = self.head[0];
        while let Some(idx) = cursor {
            if out.len() >= n {
                break;
            }
            let node = arena.get(idx);
            out.push((node.price, node.volume));
            cursor = node.forward[0];
        }
        out
    }

    /// Reverse price+volume pairs starting at `max()`, descending, capped at `n`.
    pub fn top_n_descending(&self, arena: &Arena<LevelNode>, n: usize) -> Vec<(u64, u64)> {
        let mut out = Vec::with_capacity(n.min(self.len));
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            if out.len() >= n {
                break;
            }
            let node = arena.get(idx);
            out.push((node.price, node.volume));
            cursor = node.level0_prev;
        }
        out
    }

    fn random_height(&mut self) -> usize {
        let mut h = 1;
        while h < MAX_HEIGHT && self.next_bit() {
            h += 1;
        }
        h
    }

    /// xorshift64 coin flip: cheap, deterministic given the tree's seed,
    /// and does not pull in a `rand` dependency for a single bit of
    /// per-insert randomness.
    fn next_bit(&mut self) -> bool {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng = x;
        x & 1 == 1
    }
}

#[cold]
fn fatal_duplicate_level() -> ! {
    tracing::error!("orderbook invariant violated: duplicate price level inserted into side tree");
    panic!("duplicate price level");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(tree: &mut PriceTree, arena: &mut Arena<LevelNode>, price: u64) -> LevelIndex {
        let idx = arena.insert(LevelNode::new(price));
        tree.insert(arena, idx);
        idx
    }

    #[test]
    fn min_max_track_extremes() {
        let mut arena = Arena::new();
        let mut tree = PriceTree::new(42);
        push(&mut tree, &mut arena, 100);
        push(&mut tree, &mut arena, 50);
        push(&mut tree, &mut arena, 150);
        assert_eq!(arena.get(tree.min().unwrap()).price, 50);
        assert_eq!(arena.get(tree.max().unwrap()).price, 150);
    }

    #[test]
    fn ascending_order_survives_adversarial_monotonic_insert() {
        let mut arena = Arena::new();
        let mut tree = PriceTree::new(7);
        for p in 1..=2000u64 {
            push(&mut tree, &mut arena, p);
        }
        assert_eq!(arena.get(tree.min().unwrap()).price, 1);
        assert_eq!(arena.get(tree.max().unwrap()).price, 2000);
        let top = tree.top_n_ascending(&arena, 3);
        assert_eq!(top.iter().map(|(p, _)| *p).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn remove_relinks_neighbors() {
        let mut arena = Arena::new();
        let mut tree = PriceTree::new(1);
        push(&mut tree, &mut arena, 10);
        let mid = push(&mut tree, &mut arena, 20);
        push(&mut tree, &mut arena, 30);
        let removed = tree.remove(&mut arena, 20).unwrap();
        assert_eq!(removed, mid);
        let asc: Vec<u64> = tree
            .top_n_ascending(&arena, 10)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(asc, vec![10, 30]);
        let desc: Vec<u64> = tree
            .top_n_descending(&arena, 10)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(desc, vec![30, 10]);
    }

    #[test]
    fn find_locates_existing_and_missing_prices() {
        let mut arena = Arena::new();
        let mut tree = PriceTree::new(3);
        push(&mut tree, &mut arena, 5);
        push(&mut tree, &mut arena, 15);
        assert!(tree.find(&arena, 5).is_some());
        assert!(tree.find(&arena, 9).is_none());
    }
}
