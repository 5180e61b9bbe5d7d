//! Match analyzer
//!
//! Scans rows left to right and columns top to bottom for maximal runs of one
//! ordinary kind. Power tiles break runs exactly like a differing kind, so
//! they never match by adjacency, not even with each other.

use std::collections::BTreeSet;

use super::grid::{Grid, Position, TileId, TileKind};
use crate::consts::{GRID_SIZE, MIN_RUN};

/// Set of tile ids cleared in one resolution step
pub type MatchSet = BTreeSet<TileId>;

/// Every tile that sits in a horizontal or vertical run of `MIN_RUN` or more
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut matched = MatchSet::new();

    for row in 0..GRID_SIZE {
        let line: Vec<Position> = (0..GRID_SIZE).map(|col| Position::new(row, col)).collect();
        scan_line(grid, &line, &mut matched);
    }
    for col in 0..GRID_SIZE {
        let line: Vec<Position> = (0..GRID_SIZE).map(|row| Position::new(row, col)).collect();
        scan_line(grid, &line, &mut matched);
    }

    matched
}

/// Add every qualifying run along `line` to `matched`
fn scan_line(grid: &Grid, line: &[Position], matched: &mut MatchSet) {
    let mut run_start = 0;
    for i in 1..=line.len() {
        let continues = i < line.len() && {
            let prev = grid.kind_at(line[i - 1]);
            let curr = grid.kind_at(line[i]);
            matches!((prev, curr), (Some(p), Some(c)) if p == c && c.is_ordinary())
        };
        if continues {
            continue;
        }
        if i - run_start >= MIN_RUN {
            for pos in &line[run_start..i] {
                if let Some(tile) = grid.get(*pos) {
                    matched.insert(tile.id);
                }
            }
        }
        run_start = i;
    }
}

/// Starting-board check: would `kind` at `(row, col)` finish a run with the
/// two cells directly left or the two cells directly above?
///
/// Only cells before `(row, col)` in row-major order are read, so a board
/// under construction can be passed in.
pub fn creates_initial_run(
    kinds: &[[TileKind; GRID_SIZE]; GRID_SIZE],
    row: usize,
    col: usize,
    kind: TileKind,
) -> bool {
    let left = col >= 2 && kinds[row][col - 1] == kind && kinds[row][col - 2] == kind;
    let up = row >= 2 && kinds[row - 1][col] == kind && kinds[row - 2][col] == kind;
    left || up
}

/// First adjacent swap (row-major, trying right then down) that would leave
/// at least one match on the board
pub fn find_hint(grid: &Grid) -> Option<(Position, Position)> {
    let mut probe = grid.clone();
    for pos in Position::all() {
        let neighbours = [
            Position::new(pos.row, pos.col + 1),
            Position::new(pos.row + 1, pos.col),
        ];
        for other in neighbours {
            if probe.get(other).is_none() {
                continue;
            }
            probe.swap(pos, other);
            let hit = !find_matches(&probe).is_empty();
            probe.swap(pos, other);
            if hit {
                return Some((pos, other));
            }
        }
    }
    None
}
