use regex::Regex;

use crate::hex::prelude::*;

/// Formats a coordinate in conventional Hex notation: column letter then
/// 1-based row number, so `a1` is the top-left cell.
pub fn format_move(at: Coord) -> String {
    format!("{}{}", (b'a' + at.col as u8) as char, at.row + 1)
}

/// Parses conventional Hex move notation against a board size.
pub fn parse_move(s: &str, size: usize) -> Result<Coord> {
    let pattern = Regex::new("^(?<col>[a-s])(?<row>[0-9]{1,2})$")?;
    let Some(captures) = pattern.captures(s.trim()) else {
        return Err(anyhow!("could not parse move {s}"));
    };

    let col = (captures.name("col").unwrap().as_str().as_bytes()[0] - b'a') as usize;
    let row = captures.name("row").unwrap().as_str().parse::<usize>()?;
    if row < 1 {
        return Err(anyhow!("rows are numbered from 1, received {s}"));
    }

    let at = Coord::new(row - 1, col);
    if !at.in_bounds(size) {
        return Err(anyhow!("move {s} is off a {size}x{size} board"));
    }
    Ok(at)
}

/// Parses the grid notation produced by [`Board::notate`]: rows of `B`, `W`
/// and `.` joined by `/`. The row count fixes the board size.
pub fn parse_board(s: &str, side_to_move: Side) -> Result<Board> {
    let rows: Vec<&str> = s.split('/').collect();
    let size = rows.len();

    let mut cells = Vec::with_capacity(size * size);
    for row in rows {
        if row.chars().count() != size {
            return Err(anyhow!("expected {size} cells per row, received {row}"));
        }
        for ch in row.chars() {
            cells.push(Side::parse(&ch.to_string())?);
        }
    }
    Board::from_grid(cells, side_to_move)
}

impl Board {
    /// The single-line grid notation for the position, row-major.
    pub fn notate(&self) -> String {
        (0..self.size())
            .map(|row| {
                (0..self.size())
                    .map(|col| self.occupant(Coord::new(row, col)).map_or(".".into(), |side| side.notate()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// A skewed rendering of the rhombus for human eyes.
    pub fn pretty(&self) -> String {
        let mut out = String::new();

        let header: Vec<String> = (0..self.size()).map(|col| ((b'a' + col as u8) as char).to_string()).collect();
        out.push_str(&format!("   {}\n", header.join(" ")));

        for row in 0..self.size() {
            let cells: Vec<String> = (0..self.size())
                .map(|col| self.occupant(Coord::new(row, col)).map_or(".".into(), |side| side.notate()))
                .collect();
            out.push_str(&format!("{:indent$}{:>2} {}\n", "", row + 1, cells.join(" "), indent = row));
        }
        out
    }
}
