use std::sync::atomic::{AtomicBool, Ordering};

use super::AgentConfig;
use super::evaluator::{Evaluator, WIN};
use super::tt::{Bound, TranspositionTable};
use crate::hex::prelude::*;

/// Everything a finished search reports back to the agent.
#[derive(Clone, Copy, Debug)]
pub struct SearchOutcome {
    pub best_move: Coord,
    pub value: i32,
    pub depth: u8,
    pub nodes: u64,
}

const INF: i32 = WIN + 1;

/// One search context: owns the transposition table and the node counter for
/// a single move request and dies with it. The stop flag is the only thing
/// shared with the outside world.
pub(crate) struct Searcher<'a> {
    evaluator: Evaluator,
    tt: TranspositionTable,
    stop: &'a AtomicBool,
    max_depth: u8,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(config: &AgentConfig, stop: &'a AtomicBool) -> Searcher<'a> {
        Searcher {
            evaluator: Evaluator::new(config.heuristic_coefficients, config.bridges),
            tt: TranspositionTable::new(config.tt_capacity),
            stop,
            max_depth: config.max_depth,
            nodes: 0,
        }
    }

    /// The iterative deepening driver. Each completed iteration commits its
    /// move; an interrupted iteration never disturbs the previous commitment.
    pub fn run(&mut self, board: &Board) -> Result<SearchOutcome> {
        let moves = board.legal_moves();
        let Some(&fallback) = moves.first() else {
            return Err(anyhow!("no legal move: the position has no empty cells"));
        };

        let mut work = board.clone();
        let mut committed: Option<(Coord, i32)> = None;
        let mut committed_depth = 0u8;

        // Deeper than the number of empty cells the tree is exhausted.
        let horizon = self.max_depth.min(moves.len().min(u8::MAX as usize) as u8);

        let mut depth = 1u8;
        while depth <= horizon && !self.stop.load(Ordering::Acquire) {
            match self.search_root(&mut work, depth) {
                Some((best_move, value)) => {
                    committed = Some((best_move, value));
                    committed_depth = depth;
                    log::debug!(
                        "depth {depth}: {} scores {value} ({} nodes)",
                        format_move(best_move),
                        self.nodes
                    );
                    if value.abs() >= WIN {
                        break; // proven either way, deeper search cannot improve
                    }
                }
                None => break, // interrupted mid-iteration, keep the last commitment
            }
            depth += 1;
        }

        let (best_move, value) = committed.unwrap_or((fallback, 0));
        Ok(SearchOutcome { best_move, value, depth: committed_depth, nodes: self.nodes })
    }

    /// The maximizing root: a full window over every legal move.
    fn search_root(&mut self, board: &mut Board, depth: u8) -> Option<(Coord, i32)> {
        let key = board.zobrist();
        let mut moves = board.legal_moves();
        self.order(&mut moves, self.tt.best_move(key));

        let mut alpha = -INF;
        let mut best: Option<(Coord, i32)> = None;

        for mv in moves {
            if self.stop.load(Ordering::Acquire) {
                return None;
            }
            board.play_unchecked(mv);
            let value = self.negamax(board, depth - 1, -INF, -alpha);
            board.undo_unchecked(mv);

            let value = -value?;
            if best.map_or(true, |(_, so_far)| value > so_far) {
                best = Some((mv, value));
            }
            alpha = alpha.max(value);
        }

        let (best_move, value) = best?;
        self.tt.store(key, depth, value, Bound::Exact, Some(best_move));
        Some((best_move, value))
    }

    /// Fail-soft negamax from the side to move's perspective. `None` means
    /// the stop flag fired; every caller in the iteration must discard its
    /// partial result.
    fn negamax(&mut self, board: &mut Board, depth: u8, mut alpha: i32, beta: i32) -> Option<i32> {
        if self.stop.load(Ordering::Acquire) {
            return None;
        }

        if let Some(winner) = board.winner() {
            let value = if winner == board.side_to_move() { WIN } else { -WIN };
            return Some(value);
        }

        if depth == 0 {
            self.nodes += 1;
            return Some(self.evaluator.score(board, board.side_to_move()));
        }

        let key = board.zobrist();
        if let Some(value) = self.tt.probe(key, depth, alpha, beta) {
            return Some(value);
        }

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            // Unreachable under the rules: a full board is terminal.
            return Some(self.evaluator.score(board, board.side_to_move()));
        }
        self.order(&mut moves, self.tt.best_move(key));

        let window = (alpha, beta);
        let mut best_value = -INF;
        let mut best_move = None;

        for mv in moves {
            if self.stop.load(Ordering::Acquire) {
                self.store(key, depth, best_value, best_move, window);
                return None;
            }
            board.play_unchecked(mv);
            let value = self.negamax(board, depth - 1, -beta, -alpha);
            board.undo_unchecked(mv);

            let Some(value) = value else {
                self.store(key, depth, best_value, best_move, window);
                return None;
            };
            let value = -value;

            if value > best_value {
                best_value = value;
                best_move = Some(mv);
            }
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        self.store(key, depth, best_value, best_move, window);
        Some(best_value)
    }

    /// Classifies a final value against the node's original window and caches
    /// it. A node aborted before any child completed caches nothing.
    fn store(&mut self, key: u64, depth: u8, value: i32, best_move: Option<Coord>, (alpha, beta): (i32, i32)) {
        if value <= -INF {
            return;
        }
        let bound = if value <= alpha {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, value, bound, best_move);
    }

    /// The cached best move jumps the queue; everything else stays in stable
    /// row-major order.
    fn order(&self, moves: &mut [Coord], hint: Option<Coord>) {
        if let Some(hint) = hint {
            if let Some(i) = moves.iter().position(|&mv| mv == hint) {
                moves[..=i].rotate_right(1);
            }
        }
    }
}
