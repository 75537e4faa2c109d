mod evaluator;
mod search;
mod tt;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::hex::prelude::*;

pub use evaluator::{Evaluator, WIN};
pub use search::SearchOutcome;
use search::Searcher;
pub use tt::{Bound, TranspositionTable, TtEntry};

/// What one search reported, in harness terms.
#[derive(Clone, Copy, Debug)]
pub struct SearchStats {
    pub nodes_explored: u64,
    pub depth_reached: u8,
    pub value: i32,
    pub search_type: &'static str,
}

/// The agent's tunables. Everything the search consults lives here; there is
/// no other configuration surface.
#[derive(Clone, Copy, Debug)]
pub struct AgentConfig {
    /// Iterative deepening stops at this depth even with time to spare.
    pub max_depth: u8,
    /// Slots in the transposition table; a power of two of at least 1024.
    pub tt_capacity: usize,
    /// `(a, b)` in the heuristic `a·d(opponent) − b·d(self)`.
    pub heuristic_coefficients: (i32, i32),
    /// Whether the distance graph includes bridge edges.
    pub bridges: bool,
    /// Seed for the zobrist key material of boards this agent mints.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            max_depth: 64,
            tt_capacity: 1 << 20,
            heuristic_coefficients: (10, 11),
            bridges: true,
            seed: DEFAULT_ZOBRIST_SEED,
        }
    }
}

impl AgentConfig {
    /// Gets the default configuration for hexer.
    pub fn new() -> AgentConfig {
        AgentConfig::default()
    }

    /// Rejects configurations the search cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth < 1 {
            bail!("max_depth must be at least 1, received {}", self.max_depth);
        }
        if !self.tt_capacity.is_power_of_two() || self.tt_capacity < 1024 {
            bail!(
                "tt_capacity must be a power of two of at least 1024, received {}",
                self.tt_capacity
            );
        }
        Ok(())
    }
}

/// An implementation of the actual hexer engine: iterative-deepening
/// alpha-beta over the connection-distance heuristic.
///
/// Clones share the stop flag, so a harness can hand one clone to a timer
/// thread and keep calling [`HexAgent::choose_move`] on another.
#[derive(Clone)]
pub struct HexAgent {
    config: AgentConfig,
    stop: Arc<AtomicBool>,
}

impl HexAgent {
    pub fn new(config: AgentConfig) -> Result<HexAgent> {
        config.validate()?;
        Ok(HexAgent { config, stop: Arc::new(AtomicBool::new(false)) })
    }

    /// A stable identifier for the harness.
    pub fn name(&self) -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Mints an empty board hashed with this agent's seed.
    pub fn new_game(&self, size: usize) -> Result<Board> {
        Board::with_seed(size, self.config.seed)
    }

    /// Picks a move for the side to move. Runs until the stop flag is
    /// raised, the configured depth is reached, or the tree is exhausted,
    /// and always returns a legal move for a playable position.
    pub fn choose_move(&self, board: &Board) -> Result<(Coord, SearchStats)> {
        if board.is_terminal() {
            bail!("cannot move: the game is over");
        }

        let mut searcher = Searcher::new(&self.config, &self.stop);
        let found = searcher.run(board)?;

        let stats = SearchStats {
            nodes_explored: found.nodes,
            depth_reached: found.depth,
            value: found.value,
            search_type: "alpha-beta-ids",
        };
        Ok((found.best_move, stats))
    }

    /// Static evaluation of a position for its side to move.
    pub fn evaluate(&self, board: &Board) -> i32 {
        Evaluator::new(self.config.heuristic_coefficients, self.config.bridges)
            .score(board, board.side_to_move())
    }

    /// Raises the stop flag. May be called from any thread; the running
    /// search observes it at the next node boundary.
    pub fn on_timeout(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Lowers the stop flag. The harness owns this between searches.
    pub fn clear_timeout(&self) {
        self.stop.store(false, Ordering::Release);
    }

    /// Reconfigures the depth cap on the iterative deepening loop.
    pub fn set_max_depth(&mut self, depth: u8) -> Result<()> {
        let config = AgentConfig { max_depth: depth, ..self.config };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> HexAgent {
        HexAgent::new(AgentConfig { max_depth: 2, ..AgentConfig::default() }).unwrap()
    }

    #[test]
    fn bad_configurations_are_rejected() {
        assert!(HexAgent::new(AgentConfig { max_depth: 0, ..AgentConfig::default() }).is_err());
        assert!(HexAgent::new(AgentConfig { tt_capacity: 1000, ..AgentConfig::default() }).is_err());
        assert!(HexAgent::new(AgentConfig { tt_capacity: 512, ..AgentConfig::default() }).is_err());
        assert!(HexAgent::new(AgentConfig::new()).is_ok());
    }

    #[test]
    fn chooses_legal_moves_with_stats() {
        let agent = agent();
        let board = agent.new_game(5).unwrap();
        let (mv, stats) = agent.choose_move(&board).unwrap();

        assert!(board.place(mv).is_ok());
        assert_eq!(stats.search_type, "alpha-beta-ids");
        assert!(stats.depth_reached >= 1);
        assert!(stats.nodes_explored > 0);
    }

    #[test]
    fn rejects_finished_games() {
        let agent = agent();
        let board = parse_board("...../...../WWWWW/...../.....", Side::Black).unwrap();
        assert_eq!(board.winner(), Some(Side::White));
        assert!(agent.choose_move(&board).is_err());
    }

    #[test]
    fn timeout_before_the_search_forces_the_fallback() {
        let agent = agent();
        let board = agent.new_game(5).unwrap();

        agent.on_timeout();
        let (mv, stats) = agent.choose_move(&board).unwrap();
        assert_eq!(mv, Coord::new(0, 0));
        assert_eq!(stats.depth_reached, 0);

        agent.clear_timeout();
        let (_, stats) = agent.choose_move(&board).unwrap();
        assert!(stats.depth_reached >= 1);
    }

    #[test]
    fn clones_share_the_stop_flag() {
        let agent = agent();
        let board = agent.new_game(5).unwrap();

        agent.clone().on_timeout();
        let (_, stats) = agent.choose_move(&board).unwrap();
        assert_eq!(stats.depth_reached, 0);
    }

    #[test]
    fn seeds_flow_into_minted_boards() {
        let a = HexAgent::new(AgentConfig { seed: 1, ..AgentConfig::default() }).unwrap();
        let b = HexAgent::new(AgentConfig { seed: 2, ..AgentConfig::default() }).unwrap();
        assert_ne!(a.new_game(5).unwrap().zobrist(), b.new_game(5).unwrap().zobrist());
    }

    #[test]
    fn evaluation_tracks_the_side_to_move() {
        let agent = agent();
        // Black is a single move from connecting, White is not.
        let board = parse_board("..B../..B../..B../..B../.....", Side::Black).unwrap();
        assert!(agent.evaluate(&board) > 0);
    }

    #[test]
    fn names_are_stable() {
        let agent = agent();
        assert_eq!(agent.name(), agent.name());
        assert!(agent.name().starts_with("hexer"));
    }
}
