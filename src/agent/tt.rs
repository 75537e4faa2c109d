use crate::hex::prelude::*;

/// How a stored value relates to the true score of its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// One cached search result. The full 64-bit key is kept so probes verify
/// identity instead of trusting the slot index; two positions may share a
/// slot without ever being confused for each other.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub key: u64,
    pub depth: u8,
    pub value: i32,
    pub bound: Bound,
    pub best_move: Option<Coord>,
}

/// A bounded map from zobrist keys to search results. The capacity is a
/// power of two, so slot selection is a mask.
pub struct TranspositionTable {
    slots: Vec<Option<TtEntry>>,
    mask: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> TranspositionTable {
        debug_assert!(capacity.is_power_of_two());
        TranspositionTable {
            slots: vec![None; capacity],
            mask: capacity - 1,
        }
    }

    /// Returns a value usable as a cutoff at a node with `depth` plies to go
    /// inside the `alpha..beta` window, if one is cached.
    pub fn probe(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.slots[self.slot(key)]?;
        if entry.key != key || entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.value),
            Bound::Lower if entry.value >= beta => Some(entry.value),
            Bound::Upper if entry.value <= alpha => Some(entry.value),
            _ => None,
        }
    }

    /// The cached best move for a position, usable for ordering regardless
    /// of the stored depth.
    pub fn best_move(&self, key: u64) -> Option<Coord> {
        self.slots[self.slot(key)]
            .filter(|entry| entry.key == key)
            .and_then(|entry| entry.best_move)
    }

    /// Caches a result. An existing entry survives only when it describes
    /// the same position at a greater depth.
    pub fn store(&mut self, key: u64, depth: u8, value: i32, bound: Bound, best_move: Option<Coord>) {
        let slot = self.slot(key);
        let replace = match &self.slots[slot] {
            None => true,
            Some(entry) => entry.key != key || depth >= entry.depth,
        };
        if replace {
            self.slots[slot] = Some(TtEntry { key, depth, value, bound, best_move });
        }
    }

    fn slot(&self, key: u64) -> usize {
        key as usize & self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TranspositionTable {
        TranspositionTable::new(1024)
    }

    #[test]
    fn exact_entries_cut_at_sufficient_depth() {
        let mut tt = table();
        tt.store(42, 5, 100, Bound::Exact, Some(Coord::new(1, 2)));

        assert_eq!(tt.probe(42, 5, -1000, 1000), Some(100));
        assert_eq!(tt.probe(42, 3, -1000, 1000), Some(100));
        assert_eq!(tt.probe(42, 6, -1000, 1000), None);
    }

    #[test]
    fn lower_bounds_cut_above_beta() {
        let mut tt = table();
        tt.store(42, 5, 200, Bound::Lower, None);

        assert_eq!(tt.probe(42, 5, -1000, 150), Some(200));
        assert_eq!(tt.probe(42, 5, -1000, 300), None);
    }

    #[test]
    fn upper_bounds_cut_below_alpha() {
        let mut tt = table();
        tt.store(42, 5, 50, Bound::Upper, None);

        assert_eq!(tt.probe(42, 5, 100, 1000), Some(50));
        assert_eq!(tt.probe(42, 5, 30, 1000), None);
    }

    #[test]
    fn colliding_keys_never_alias() {
        let mut tt = table();
        let key = 42u64;
        let collider = key | (1 << 40); // same slot under the 1024 mask

        tt.store(key, 5, 100, Bound::Exact, Some(Coord::new(0, 0)));
        assert_eq!(tt.probe(collider, 1, -1000, 1000), None);
        assert_eq!(tt.best_move(collider), None);
    }

    #[test]
    fn best_move_survives_depth_requirements() {
        let mut tt = table();
        tt.store(42, 2, 7, Bound::Exact, Some(Coord::new(3, 3)));

        assert_eq!(tt.probe(42, 6, -1000, 1000), None);
        assert_eq!(tt.best_move(42), Some(Coord::new(3, 3)));
    }

    #[test]
    fn replacement_prefers_depth_for_the_same_position() {
        let mut tt = table();
        tt.store(42, 5, 100, Bound::Exact, Some(Coord::new(1, 1)));
        tt.store(42, 3, 999, Bound::Exact, Some(Coord::new(2, 2)));

        // The shallower rewrite of the same position is discarded.
        assert_eq!(tt.probe(42, 5, -1000, 1000), Some(100));

        // A different position always claims the slot.
        let collider = 42u64 | (1 << 40);
        tt.store(collider, 1, 55, Bound::Exact, None);
        assert_eq!(tt.probe(42, 1, -1000, 1000), None);
        assert_eq!(tt.probe(collider, 1, -1000, 1000), Some(55));
    }
}
