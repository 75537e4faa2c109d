use crate::utils::prelude::*;

/// Board size used when a game does not name one.
pub const DEFAULT_BOARD_SIZE: usize = 11;

/// Largest supported board; also the extent of the `a`..`s` move alphabet.
pub const MAX_BOARD_SIZE: usize = 19;

// A stone colouring.
//
// Black owns the top and bottom edges (rows 0 and N-1); White owns the left
// and right edges (columns 0 and N-1).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Black = 0,
    White = 1,
}

impl Side {
    /// Notates the side.
    pub fn notate(&self) -> String {
        match self {
            Side::Black => "B",
            Side::White => "W",
        }
        .into()
    }

    /// The given side's scoring factor.
    pub fn perspective(&self) -> i32 {
        match self {
            Side::Black => 1,
            Side::White => -1,
        }
    }

    /// Index of an occupant in the three-valued occupancy space, where 0 is
    /// an empty cell.
    pub(crate) fn occupancy(value: Option<Side>) -> usize {
        value.map_or(0, |side| side as usize + 1)
    }

    /// Parses into a side.
    pub fn parse(s: &str) -> Result<Option<Side>> {
        match s {
            "b" | "B" | "x" | "X" => Ok(Some(Side::Black)),
            "w" | "W" | "o" | "O" => Ok(Some(Side::White)),
            "_" | "-" | "." => Ok(None),
            _ => Err(anyhow!("invalid notation {s} for side")),
        }
    }
}

impl Neg for Side {
    type Output = Side;
    fn neg(self) -> Self::Output {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}
