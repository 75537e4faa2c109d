use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hasher},
    sync::{Arc, Mutex, OnceLock},
};

use crate::hex::prelude::*;

/// Seed that derives the key material when a caller does not supply one.
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x51ab_c95d_4e8f_7132;

static KEY_CACHE: OnceLock<Mutex<HashMap<(usize, u64), Arc<ZobristKeys>>>> = OnceLock::new();

/// Key material for boards of one size: a 64-bit constant per (cell,
/// occupancy) pair plus one per side to move. Generated once per (size, seed)
/// and shared process-wide; the stream is deterministic, so keys are stable
/// within a process and tests can pin them by seed.
#[derive(Debug)]
pub struct ZobristKeys {
    size: usize,
    cells: Vec<u64>,
    turn: [u64; 2],
}

impl ZobristKeys {
    /// Fetches the shared key material for the given board size and seed,
    /// generating it on first use.
    pub fn shared(size: usize, seed: u64) -> Arc<ZobristKeys> {
        let cache = KEY_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut cache = cache.lock().unwrap();
        cache
            .entry((size, seed))
            .or_insert_with(|| Arc::new(ZobristKeys::generate(size, seed)))
            .clone()
    }

    fn generate(size: usize, seed: u64) -> ZobristKeys {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(seed ^ size as u64);

        let mut cells = vec![0u64; size * size * 3];
        for (i, entry) in cells.iter_mut().enumerate() {
            hasher.write_usize(i);
            *entry = hasher.finish();
        }

        let mut turn = [0u64; 2];
        for (i, entry) in turn.iter_mut().enumerate() {
            hasher.write_usize(size * size * 3 + i);
            *entry = hasher.finish();
        }

        ZobristKeys { size, cells, turn }
    }

    /// Gets the key for an occupant on a board cell.
    pub fn cell(&self, at: Coord, occupant: Option<Side>) -> u64 {
        self.cells[(at.row * self.size + at.col) * 3 + Side::occupancy(occupant)]
    }

    /// Gets the key for the side to move.
    pub fn turn(&self, side: Side) -> u64 {
        self.turn[side as usize]
    }

    /// The board size this material was generated for.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_per_seed() {
        let a = ZobristKeys::generate(5, 7);
        let b = ZobristKeys::generate(5, 7);
        let at = Coord::new(2, 3);
        assert_eq!(a.cell(at, Some(Side::Black)), b.cell(at, Some(Side::Black)));
        assert_eq!(a.cell(at, None), b.cell(at, None));
        assert_eq!(a.turn(Side::White), b.turn(Side::White));
    }

    #[test]
    fn seeds_produce_distinct_material() {
        let a = ZobristKeys::generate(5, 1);
        let b = ZobristKeys::generate(5, 2);
        assert_ne!(a.cell(Coord::new(0, 0), None), b.cell(Coord::new(0, 0), None));
    }

    #[test]
    fn occupants_produce_distinct_keys() {
        let keys = ZobristKeys::generate(5, 3);
        let at = Coord::new(1, 4);
        assert_ne!(keys.cell(at, None), keys.cell(at, Some(Side::Black)));
        assert_ne!(keys.cell(at, Some(Side::Black)), keys.cell(at, Some(Side::White)));
        assert_ne!(keys.turn(Side::Black), keys.turn(Side::White));
    }

    #[test]
    fn shared_material_is_cached() {
        let a = ZobristKeys::shared(4, 99);
        let b = ZobristKeys::shared(4, 99);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.size(), 4);
    }
}
