/*
 *  The game of Hex on an N×N rhombic board.
 */

pub mod board;
pub mod consts;
pub mod coords;
pub mod notation;
pub mod zobrist;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::Board,
        consts::*,
        coords::{self, *},
        notation::*,
        zobrist::{DEFAULT_ZOBRIST_SEED, ZobristKeys},
    };
}
