//! Depth queries and a human-readable ladder rendering.

use crate::orderbook::book::OrderBook;
use crate::orderbook::side::Side;
use std::fmt::Write as _;

/// One row of aggregated depth: a price and its total resting volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: u64,
    pub volume: u64,
}

impl OrderBook {
    /// The best `n` price levels on `side`, best-to-worst.
    ///
    /// For `Ask`, "best" is lowest price (ascending); for `Bid`, "best"
    /// is highest price (descending). Runs in `O(n + depth)`.
    pub fn top_n(&self, side: Side, n: usize) -> Vec<DepthLevel> {
        let rows = match side {
            Side::Ask => self.ask_tree.top_n_ascending(&self.levels, n),
            Side::Bid => self.bid_tree.top_n_descending(&self.levels, n),
        };
        rows.into_iter()
            .map(|(price, volume)| DepthLevel { price, volume })
            .collect()
    }

    /// Renders the full book as a two-block ladder: asks from worst to
    /// best, a separator, then bids from best to worst — the same shape
    /// as a traditional order book print.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let asks = self.ask_tree.top_n_ascending(&self.levels, self.ask_tree.len());
        for (price, volume) in asks.into_iter().rev() {
            let _ = writeln!(out, "ASK {price:>10} {volume:>10}");
        }
        let _ = writeln!(out, "------------------------");
        let bids = self.bid_tree.top_n_descending(&self.levels, self.bid_tree.len());
        for (price, volume) in bids {
            let _ = writeln!(out, "BID {price:>10} {volume:>10}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::events::NullSink;

    #[test]
    fn top_n_bid_is_descending_by_price() {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 1, Side::Bid, 100, 5).unwrap();
        book.submit_limit(&mut sink, 2, Side::Bid, 105, 5).unwrap();
        book.submit_limit(&mut sink, 3, Side::Bid, 95, 5).unwrap();
        let top = book.top_n(Side::Bid, 2);
        assert_eq!(top, vec![
            DepthLevel { price: 105, volume: 5 },
            DepthLevel { price: 100, volume: 5 },
        ]);
    }

    #[test]
    fn top_n_ask_is_ascending_by_price() {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 1, Side::Ask, 100, 5).unwrap();
        book.submit_limit(&mut sink, 2, Side::Ask, 105, 5).unwrap();
        book.submit_limit(&mut sink, 3, Side::Ask, 95, 5).unwrap();
        let top = book.top_n(Side::Ask, 2);
        assert_eq!(top, vec![
            DepthLevel { price: 95, volume: 5 },
            DepthLevel { price: 100, volume: 5 },
        ]);
    }

    #[test]
    fn render_lists_asks_worst_to_best_then_bids_best_to_worst() {
        let mut book = OrderBook::new(1);
        let mut sink = NullSink;
        book.submit_limit(&mut sink, 1, Side::Ask, 101, 5).unwrap();
        book.submit_limit(&mut sink, 2, Side::Ask, 100, 5).unwrap();
        book.submit_limit(&mut sink, 3, Side::Bid, 99, 5).unwrap();
        book.submit_limit(&mut sink, 4, Side::Bid, 98, 5).unwrap();
        let rendered = book.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("101"));
        assert!(lines[1].contains("100"));
        assert!(lines[2].starts_with("---"));
        assert!(lines[3].contains("99"));
        assert!(lines[4].contains("98"));
    }
}
