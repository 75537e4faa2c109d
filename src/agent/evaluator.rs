use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::hex::prelude::*;

/// Score of a proven win; strictly larger than any value the distance
/// weights can produce on a supported board.
pub const WIN: i32 = 1_000_000;

/// Scores positions by connection distance: how many empty cells a side
/// still has to fill to join its two edges, under hex adjacency plus bridge
/// edges.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    attack_weight: i32,
    defence_weight: i32,
    bridges: bool,
}

impl Evaluator {
    pub fn new(coefficients: (i32, i32), bridges: bool) -> Evaluator {
        Evaluator {
            attack_weight: coefficients.0,
            defence_weight: coefficients.1,
            bridges,
        }
    }

    /// The sentinel distance of a side whose edges can no longer be joined.
    pub fn unreachable(size: usize) -> u32 {
        (size * size + 1) as u32
    }

    /// The heuristic for the given side. The weight on the side's own
    /// distance exceeds the weight on the opponent's by one, so among equal
    /// opponent distances the shorter own path scores higher.
    pub fn score(&self, board: &Board, side: Side) -> i32 {
        let own = self.distance(board, side) as i32;
        let theirs = self.distance(board, -side) as i32;
        self.attack_weight * theirs - self.defence_weight * own
    }

    /// Connection distance for a side. Zero means the side has won or wins on
    /// its next placement; [`Evaluator::unreachable`] means the opponent has
    /// severed every chain candidate.
    pub fn distance(&self, board: &Board, side: Side) -> u32 {
        let raw = self.raw_distance(board, side);
        if raw <= 1 { 0 } else { raw }
    }

    /// Dijkstra from the side's starting edge towards its goal edge. Own
    /// stones cost nothing to traverse, empty cells cost one, opponent stones
    /// are impassable. A bridge edge reaches an empty cell two steps out for
    /// a cost of one while both carriers are empty.
    fn raw_distance(&self, board: &Board, side: Side) -> u32 {
        let size = board.size();
        let index = |at: Coord| at.row * size + at.col;
        let arrived = |at: Coord| match side {
            Side::Black => at.row == size - 1,
            Side::White => at.col == size - 1,
        };

        let mut best = vec![u32::MAX; size * size];
        let mut frontier: BinaryHeap<Reverse<(u32, usize, usize)>> = BinaryHeap::new();

        for i in 0..size {
            let at = match side {
                Side::Black => Coord::new(0, i),
                Side::White => Coord::new(i, 0),
            };
            let cost = match board.occupant(at) {
                Some(s) if s == side => 0,
                None => 1,
                Some(_) => continue,
            };
            if cost < best[index(at)] {
                best[index(at)] = cost;
                frontier.push(Reverse((cost, at.row, at.col)));
            }
        }

        while let Some(Reverse((cost, row, col))) = frontier.pop() {
            let at = Coord::new(row, col);
            if cost > best[index(at)] {
                continue;
            }
            if arrived(at) {
                return cost;
            }

            for neighbour in NEIGHBOUR_OFFSETS.iter() {
                let next = at + neighbour;
                if !next.in_bounds_signed(size) {
                    continue;
                }
                let next = next.coerce();
                let step = match board.occupant(next) {
                    Some(s) if s == side => 0,
                    None => 1,
                    Some(_) => continue,
                };
                if cost + step < best[index(next)] {
                    best[index(next)] = cost + step;
                    frontier.push(Reverse((cost + step, next.row, next.col)));
                }
            }

            if self.bridges {
                // Cells in the frontier are own or empty, so every popped
                // cell is a valid bridge origin.
                for bridge in BRIDGE_OFFSETS.iter() {
                    let target = at + bridge.target;
                    if !target.in_bounds_signed(size) {
                        continue;
                    }
                    let target = target.coerce();
                    if board.occupant(target).is_some() {
                        continue;
                    }
                    let carried = bridge.carriers.iter().all(|carrier| {
                        let between = at + carrier;
                        between.in_bounds_signed(size) && board.occupant(between.coerce()).is_none()
                    });
                    if !carried {
                        continue;
                    }
                    if cost + 1 < best[index(target)] {
                        best[index(target)] = cost + 1;
                        frontier.push(Reverse((cost + 1, target.row, target.col)));
                    }
                }
            }
        }

        Evaluator::unreachable(size)
    }
}
