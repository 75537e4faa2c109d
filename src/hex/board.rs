use std::sync::Arc;

use crate::hex::prelude::*;

/// A Hex position: an N×N rhombus of cells, the side to move, and the
/// incrementally maintained zobrist key of the pair.
///
/// The board is a value: `place` returns a fresh board, clones are cheap, and
/// the engine's unchecked apply/undo entry points mutate one working copy.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Side>>,
    side_to_move: Side,
    key: u64,
    keys: Arc<ZobristKeys>,
}

impl Board {
    /// Returns an empty board hashed with the default seed.
    pub fn new(size: usize) -> Result<Board> {
        Board::with_seed(size, DEFAULT_ZOBRIST_SEED)
    }

    /// Returns an empty board whose key material derives from the given seed.
    pub fn with_seed(size: usize, seed: u64) -> Result<Board> {
        if size < 1 || size > MAX_BOARD_SIZE {
            return Err(anyhow!("board size {size} is outside 1..={MAX_BOARD_SIZE}"));
        }

        let keys = ZobristKeys::shared(size, seed);
        let cells = vec![None; size * size];
        let key = Board::initial_key(&keys, &cells, size, Side::Black);
        Ok(Board { size, cells, side_to_move: Side::Black, key, keys })
    }

    /// Builds a board from a pre-formed grid, hashed with the default seed.
    pub fn from_grid(cells: Vec<Option<Side>>, side_to_move: Side) -> Result<Board> {
        let size = cells.len().isqrt();
        if size < 1 || size > MAX_BOARD_SIZE || size * size != cells.len() {
            return Err(anyhow!("a grid of {} cells is not a square board", cells.len()));
        }

        let keys = ZobristKeys::shared(size, DEFAULT_ZOBRIST_SEED);
        let key = Board::initial_key(&keys, &cells, size, side_to_move);
        Ok(Board { size, cells, side_to_move, key, keys })
    }

    /// Folds the full key for a grid. Every cell contributes the constant for
    /// its occupancy, empty cells included, plus one term for the turn.
    fn initial_key(keys: &ZobristKeys, cells: &[Option<Side>], size: usize, side_to_move: Side) -> u64 {
        let mut key = keys.turn(side_to_move);
        for row in 0..size {
            for col in 0..size {
                key ^= keys.cell(Coord::new(row, col), cells[row * size + col]);
            }
        }
        key
    }

    /// The side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The occupant of a cell. Panics if the coord is off the board.
    pub fn occupant(&self, at: Coord) -> Option<Side> {
        self.cells[self.index(at)]
    }

    /// The occupant of a cell, checked.
    pub fn cell(&self, at: Coord) -> Result<Option<Side>> {
        if !at.in_bounds(self.size) {
            return Err(anyhow!("coord ({}, {}) is off a {}x{} board", at.row, at.col, self.size, self.size));
        }
        Ok(self.cells[at.row * self.size + at.col])
    }

    /// The side whose turn it is.
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Every empty cell, in row-major order.
    pub fn legal_moves(&self) -> Vec<Coord> {
        let mut moves = Vec::with_capacity(self.cells.len());
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[row * self.size + col].is_none() {
                    moves.push(Coord::new(row, col));
                }
            }
        }
        moves
    }

    /// Plays a move for the side to move, if legal, producing a fresh board.
    pub fn place(&self, at: Coord) -> Result<Board> {
        let mut next = self.clone();
        next.play(at)?;
        Ok(next)
    }

    /// Plays a move for the side to move in place, if legal.
    pub fn play(&mut self, at: Coord) -> Result<()> {
        if self.is_terminal() {
            return Err(anyhow!("illegal move {}: the game is over", format_move(at)));
        }
        if self.cell(at)?.is_some() {
            return Err(anyhow!("illegal move {}: the cell is occupied", format_move(at)));
        }
        self.play_unchecked(at);
        Ok(())
    }

    /// Places a stone for the side to move with no checks; engine use only.
    /// The key picks up the cell transition and the turn flip in four XORs.
    pub(crate) fn play_unchecked(&mut self, at: Coord) {
        let mover = self.side_to_move;
        let idx = self.index(at);
        debug_assert!(self.cells[idx].is_none());

        self.key ^= self.keys.cell(at, None)
            ^ self.keys.cell(at, Some(mover))
            ^ self.keys.turn(mover)
            ^ self.keys.turn(-mover);
        self.cells[idx] = Some(mover);
        self.side_to_move = -mover;
    }

    /// Removes the stone the previous mover placed; engine use only.
    pub(crate) fn undo_unchecked(&mut self, at: Coord) {
        let mover = -self.side_to_move;
        let idx = self.index(at);
        debug_assert_eq!(self.cells[idx], Some(mover));

        self.key ^= self.keys.cell(at, None)
            ^ self.keys.cell(at, Some(mover))
            ^ self.keys.turn(mover)
            ^ self.keys.turn(-mover);
        self.cells[idx] = None;
        self.side_to_move = mover;
    }

    /// Whether the game is over.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// The winning side, if either has connected its edges. Hex admits no
    /// draws and at most one connected side.
    pub fn winner(&self) -> Option<Side> {
        [Side::Black, Side::White].into_iter().find(|&side| self.connected(side))
    }

    /// Flood fill over one side's stones from its first target edge, looking
    /// for the opposite edge.
    fn connected(&self, side: Side) -> bool {
        let start = |i: usize| match side {
            Side::Black => Coord::new(0, i),
            Side::White => Coord::new(i, 0),
        };
        let arrived = |at: Coord| match side {
            Side::Black => at.row == self.size - 1,
            Side::White => at.col == self.size - 1,
        };

        let mut seen = vec![false; self.size * self.size];
        let mut stack: Vec<Coord> = (0..self.size)
            .map(start)
            .filter(|&at| self.cells[at.row * self.size + at.col] == Some(side))
            .collect();

        while let Some(at) = stack.pop() {
            let idx = at.row * self.size + at.col;
            if seen[idx] {
                continue;
            }
            seen[idx] = true;

            if arrived(at) {
                return true;
            }
            for neighbour in NEIGHBOUR_OFFSETS.iter() {
                let next = at + neighbour;
                if !next.in_bounds_signed(self.size) {
                    continue;
                }
                let next = next.coerce();
                if !seen[next.row * self.size + next.col]
                    && self.cells[next.row * self.size + next.col] == Some(side)
                {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Gets the canonical hash for the position.
    pub fn zobrist(&self) -> u64 {
        self.key
    }

    fn index(&self, at: Coord) -> usize {
        assert!(at.in_bounds(self.size), "coord ({}, {}) is off a {}x{} board", at.row, at.col, self.size, self.size);
        at.row * self.size + at.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(size: usize, moves: &[(usize, usize)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(row, col) in moves {
            board.play(Coord::new(row, col)).unwrap();
        }
        board
    }

    #[test]
    fn turns_alternate() {
        let mut board = Board::new(5).unwrap();
        assert_eq!(board.side_to_move(), Side::Black);
        board.play(Coord::new(2, 2)).unwrap();
        assert_eq!(board.side_to_move(), Side::White);
        board.play(Coord::new(1, 1)).unwrap();
        assert_eq!(board.side_to_move(), Side::Black);
    }

    #[test]
    fn occupied_cells_are_illegal() {
        let board = played(5, &[(2, 2)]);
        assert!(board.place(Coord::new(2, 2)).is_err());
        assert!(board.place(Coord::new(2, 3)).is_ok());
    }

    #[test]
    fn place_leaves_the_original_untouched() {
        let board = Board::new(5).unwrap();
        let next = board.place(Coord::new(0, 0)).unwrap();
        assert_eq!(board.occupant(Coord::new(0, 0)), None);
        assert_eq!(next.occupant(Coord::new(0, 0)), Some(Side::Black));
        assert_ne!(board.zobrist(), next.zobrist());
    }

    #[test]
    fn vertical_chain_wins_for_black() {
        let board = played(3, &[(0, 1), (0, 0), (1, 1), (0, 2), (2, 1)]);
        assert_eq!(board.winner(), Some(Side::Black));
        assert!(board.is_terminal());
    }

    #[test]
    fn horizontal_chain_wins_for_white() {
        let board = played(3, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)]);
        assert_eq!(board.winner(), Some(Side::White));
    }

    #[test]
    fn diagonal_adjacency_links_chains() {
        // (0,1) and (1,0) touch through the (1,-1) neighbour offset.
        let board = played(2, &[(0, 1), (1, 1), (1, 0)]);
        assert_eq!(board.winner(), Some(Side::Black));
    }

    #[test]
    fn finished_games_reject_moves() {
        let mut board = played(2, &[(0, 0), (1, 1), (1, 0)]);
        assert_eq!(board.winner(), Some(Side::Black));
        assert!(board.play(Coord::new(0, 1)).is_err());
    }

    #[test]
    fn open_games_have_no_winner() {
        let board = played(3, &[(0, 1), (1, 0), (1, 1)]);
        assert_eq!(board.winner(), None);
        assert!(!board.is_terminal());
    }

    #[test]
    fn legal_moves_run_row_major() {
        let board = played(2, &[(0, 1)]);
        let moves: Vec<(usize, usize)> = board.legal_moves().iter().map(|m| (m.row, m.col)).collect();
        assert_eq!(moves, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn incremental_key_matches_recompute() {
        let board = played(5, &[(0, 0), (4, 4), (2, 2), (1, 3), (3, 1)]);
        let recomputed = Board::initial_key(&board.keys, &board.cells, board.size, board.side_to_move);
        assert_eq!(board.zobrist(), recomputed);
    }

    #[test]
    fn undo_restores_key_and_turn() {
        let mut board = played(5, &[(0, 0), (1, 1)]);
        let key = board.zobrist();

        board.play_unchecked(Coord::new(2, 2));
        assert_ne!(board.zobrist(), key);
        board.undo_unchecked(Coord::new(2, 2));

        assert_eq!(board.zobrist(), key);
        assert_eq!(board.side_to_move(), Side::Black);
        assert_eq!(board.occupant(Coord::new(2, 2)), None);
    }

    #[test]
    fn transpositions_share_a_key() {
        let a = played(5, &[(0, 0), (1, 1), (2, 2)]);
        let b = played(5, &[(2, 2), (1, 1), (0, 0)]);
        assert_eq!(a.zobrist(), b.zobrist());

        let c = played(5, &[(0, 0), (1, 1), (2, 3)]);
        assert_ne!(a.zobrist(), c.zobrist());
    }

    #[test]
    fn turn_alone_changes_the_key() {
        let with_black_to_move = Board::from_grid(vec![None; 9], Side::Black).unwrap();
        let with_white_to_move = Board::from_grid(vec![None; 9], Side::White).unwrap();
        assert_ne!(with_black_to_move.zobrist(), with_white_to_move.zobrist());
    }

    #[test]
    fn seeds_change_keys() {
        let a = Board::with_seed(5, 1).unwrap();
        let b = Board::with_seed(5, 2).unwrap();
        assert_ne!(a.zobrist(), b.zobrist());
    }

    #[test]
    fn unreasonable_sizes_are_rejected() {
        assert!(Board::new(0).is_err());
        assert!(Board::new(MAX_BOARD_SIZE + 1).is_err());
        assert!(Board::from_grid(vec![None; 7], Side::Black).is_err());
    }
}
