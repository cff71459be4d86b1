// 7.0 board.rs: deterministic sell/buy projection of the store. sells first,
// then buys, each sorted ascending by premium with ties kept in store order.
// this is the canonical display order, and the only legitimate way to turn a
// user-facing ordinal into a store position. always recomputed fresh; the
// store may have changed since the board was last rendered, so caching a
// projection would resolve ordinals against a stale set.

use crate::record::TradeRecord;
use crate::store::TradeStore;
use crate::types::Side;

/** 7.1: one board line, pinned to its current store position */
#[derive(Debug, Clone, Copy)]
pub struct BoardEntry<'a> {
    pub store_position: usize,
    pub record: &'a TradeRecord,
}

#[derive(Debug)]
pub struct BoardView<'a> {
    pub sell: Vec<BoardEntry<'a>>,
    pub buy: Vec<BoardEntry<'a>>,
}

impl<'a> BoardView<'a> {
    pub fn project(store: &'a TradeStore) -> Self {
        let mut sell = Vec::new();
        let mut buy = Vec::new();
        for (store_position, record) in store.records().iter().enumerate() {
            let entry = BoardEntry {
                store_position,
                record,
            };
            match record.side {
                Side::Sell => sell.push(entry),
                Side::Buy => buy.push(entry),
            }
        }
        // stable: equal premiums keep their store order
        sell.sort_by_key(|e| e.record.premium);
        buy.sort_by_key(|e| e.record.premium);
        Self { sell, buy }
    }

    /// Sell entries followed by buy entries, each premium-ascending.
    pub fn display_order(&self) -> impl Iterator<Item = &BoardEntry<'a>> {
        self.sell.iter().chain(self.buy.iter())
    }

    /// Resolves a 1-based display ordinal to a board entry.
    pub fn resolve_ordinal(&self, ordinal: usize) -> Option<&BoardEntry<'a>> {
        if ordinal == 0 {
            return None;
        }
        self.display_order().nth(ordinal - 1)
    }

    pub fn len(&self) -> usize {
        self.sell.len() + self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sell.is_empty() && self.buy.is_empty()
    }
}

// 7.2: one-shot ordinal → store position lookup for privileged targeted
// deletion. projects fresh so the caller can immediately mutate the store.
pub fn resolve_display_ordinal(store: &TradeStore, ordinal: usize) -> Option<usize> {
    BoardView::project(store)
        .resolve_ordinal(ordinal)
        .map(|entry| entry.store_position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::types::{Method, OwnerId, Unit};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn store_with(premiums: &[(Side, &str)]) -> (tempfile::TempDir, TradeStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::with_snapshot_path(dir.path().join("trades.json"));
        let mut store = TradeStore::open(config).unwrap();
        for (i, (side, premium)) in premiums.iter().enumerate() {
            store
                .create(
                    OwnerId(i as u64),
                    &format!("member-{i}"),
                    *side,
                    Method::Lightning,
                    Unit::Sats,
                    "1000000",
                    premium,
                    "",
                )
                .unwrap();
        }
        (dir, store)
    }

    fn premiums(entries: &[BoardEntry<'_>]) -> Vec<Decimal> {
        entries.iter().map(|e| e.record.premium.value()).collect()
    }

    #[test]
    fn sells_then_buys_each_premium_ascending() {
        let (_dir, store) = store_with(&[
            (Side::Sell, "5.0"),
            (Side::Buy, "2.0"),
            (Side::Sell, "1.0"),
            (Side::Buy, "-1.0"),
            (Side::Sell, "3.0"),
        ]);
        let board = BoardView::project(&store);

        assert_eq!(premiums(&board.sell), vec![dec!(1.0), dec!(3.0), dec!(5.0)]);
        assert_eq!(premiums(&board.buy), vec![dec!(-1.0), dec!(2.0)]);

        let display: Vec<Decimal> = board
            .display_order()
            .map(|e| e.record.premium.value())
            .collect();
        assert_eq!(
            display,
            vec![dec!(1.0), dec!(3.0), dec!(5.0), dec!(-1.0), dec!(2.0)]
        );
    }

    #[test]
    fn equal_premiums_keep_store_order() {
        let (_dir, store) = store_with(&[
            (Side::Sell, "2.0"),
            (Side::Sell, "2.0"),
            (Side::Sell, "2.0"),
        ]);
        let board = BoardView::project(&store);
        let positions: Vec<usize> = board.sell.iter().map(|e| e.store_position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn ordinal_resolution_is_one_based() {
        let (_dir, store) = store_with(&[(Side::Sell, "5.0"), (Side::Buy, "-1.0")]);
        let board = BoardView::project(&store);

        assert!(board.resolve_ordinal(0).is_none());
        assert_eq!(board.resolve_ordinal(1).unwrap().record.side, Side::Sell);
        assert_eq!(board.resolve_ordinal(2).unwrap().record.side, Side::Buy);
        assert!(board.resolve_ordinal(3).is_none());
    }

    #[test]
    fn ordinal_maps_to_store_position_for_deletion() {
        let (_dir, mut store) = store_with(&[
            (Side::Sell, "5.0"),
            (Side::Sell, "1.0"),
            (Side::Buy, "2.0"),
        ]);

        // display #1 is the 1.0 sell, which sits at store position 1
        let position = resolve_display_ordinal(&store, 1).unwrap();
        assert_eq!(position, 1);

        let removed = store.delete_at(position).unwrap();
        assert_eq!(removed.premium.value(), dec!(1.0));

        // recomputed projection reflects the removal
        assert_eq!(resolve_display_ordinal(&store, 1), Some(0));
        assert_eq!(resolve_display_ordinal(&store, 3), None);
    }

    #[test]
    fn empty_store_projects_empty_board() {
        let (_dir, store) = store_with(&[]);
        let board = BoardView::project(&store);
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
        assert!(board.resolve_ordinal(1).is_none());
    }
}
