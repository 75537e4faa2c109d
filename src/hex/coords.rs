use crate::hex::prelude::*;

/// Simple board coordinate; bounded by the owning board's size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    /// Constructs a new coord.
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// Determines whether or not the coord is on a board of the given size.
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

/// Signed offset pair that can be used to calculate neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetCoord {
    pub rows: isize,
    pub cols: isize,
}

/// Offsets that turn a cell into one of its six hexagonal neighbours.
pub static NEIGHBOUR_OFFSETS: [OffsetCoord; 6] = [
    OffsetCoord { rows: -1, cols: 0 },
    OffsetCoord { rows: -1, cols: 1 },
    OffsetCoord { rows: 0, cols: -1 },
    OffsetCoord { rows: 0, cols: 1 },
    OffsetCoord { rows: 1, cols: -1 },
    OffsetCoord { rows: 1, cols: 0 },
];

/// A bridge target with its carrier pair: the two cells every path between
/// the endpoints runs through. The opponent cannot sever the connection with
/// a single stone while both carriers stay empty.
#[derive(Clone, Copy, Debug)]
pub struct BridgeOffset {
    pub target: OffsetCoord,
    pub carriers: [OffsetCoord; 2],
}

const fn offset(rows: isize, cols: isize) -> OffsetCoord {
    OffsetCoord { rows, cols }
}

/// The six bridges. Each target is the sum of two adjacent neighbour
/// directions, and those two directions are exactly its carriers.
pub static BRIDGE_OFFSETS: [BridgeOffset; 6] = [
    BridgeOffset { target: offset(-2, 1), carriers: [offset(-1, 0), offset(-1, 1)] },
    BridgeOffset { target: offset(-1, 2), carriers: [offset(-1, 1), offset(0, 1)] },
    BridgeOffset { target: offset(1, 1), carriers: [offset(0, 1), offset(1, 0)] },
    BridgeOffset { target: offset(2, -1), carriers: [offset(1, 0), offset(1, -1)] },
    BridgeOffset { target: offset(1, -2), carriers: [offset(1, -1), offset(0, -1)] },
    BridgeOffset { target: offset(-1, -1), carriers: [offset(0, -1), offset(-1, 0)] },
];

impl OffsetCoord {
    /// Coerces the offset into a coordinate unchecked.
    pub fn coerce(&self) -> Coord {
        Coord {
            row: self.rows as usize,
            col: self.cols as usize,
        }
    }

    /// Determines whether or not the offset names a cell on a board of the
    /// given size.
    pub fn in_bounds_signed(&self, size: usize) -> bool {
        0 <= self.rows && self.rows < size as isize && 0 <= self.cols && self.cols < size as isize
    }

    /// Constructs a new offset coord.
    pub fn new(rows: isize, cols: isize) -> OffsetCoord {
        OffsetCoord { rows, cols }
    }
}

// C -> OC

impl From<Coord> for OffsetCoord {
    fn from(value: Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

impl From<&Coord> for OffsetCoord {
    fn from(value: &Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

// OC + OC

impl Add<&OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        OffsetCoord {
            rows: self.rows + rhs.rows,
            cols: self.cols + rhs.cols,
        }
    }
}

impl Add<OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

// C + OC

impl Add<&OffsetCoord> for &Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        &OffsetCoord::from(self) + rhs
    }
}

impl Add<OffsetCoord> for &Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        self + &rhs
    }
}

impl Add<&OffsetCoord> for Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        &self + rhs
    }
}

impl Add<OffsetCoord> for Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_carriers_flank_both_endpoints() {
        for bridge in BRIDGE_OFFSETS.iter() {
            assert_ne!(bridge.carriers[0], bridge.carriers[1]);
            for carrier in bridge.carriers.iter() {
                // A carrier neighbours the origin and the target alike.
                assert!(NEIGHBOUR_OFFSETS.contains(carrier));
                let onward = OffsetCoord::new(
                    bridge.target.rows - carrier.rows,
                    bridge.target.cols - carrier.cols,
                );
                assert!(NEIGHBOUR_OFFSETS.contains(&onward));
            }
        }
    }

    #[test]
    fn offsets_respect_bounds() {
        let origin = Coord::new(2, 2);
        for neighbour in NEIGHBOUR_OFFSETS.iter() {
            assert!((origin + neighbour).in_bounds_signed(5));
        }
        assert!(!(Coord::new(0, 0) + OffsetCoord::new(-2, 1)).in_bounds_signed(5));
        assert!(!(Coord::new(4, 4) + OffsetCoord::new(1, 1)).in_bounds_signed(5));
    }

    #[test]
    fn coercion_round_trips() {
        let at = Coord::new(3, 1);
        assert_eq!(OffsetCoord::from(at).coerce(), at);
    }
}
