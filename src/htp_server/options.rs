use crate::prelude::*;
use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct HTPServerOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Board size used when `newgame` does not name one.
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Depth cap on the iterative deepening loop.
    #[arg(short, long)]
    pub depth: Option<u8>,

    /// Transposition table capacity in entries; a power of two.
    #[arg(long)]
    pub table_entries: Option<usize>,

    /// Default budget for `genmove`, in milliseconds.
    #[arg(short, long, default_value_t = 5000)]
    pub movetime: u64,

    /// Search without bridge edges in the distance graph.
    #[arg(long, default_value_t = false)]
    pub no_bridges: bool,

    /// Seed for the zobrist key material.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl HTPServerOptions {
    pub fn agent_config(&self) -> AgentConfig {
        let mut config = AgentConfig::default();

        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(entries) = self.table_entries {
            config.tt_capacity = entries;
        }
        if self.no_bridges {
            config.bridges = false;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config
    }
}
