//! Grid store: the authoritative position -> tile mapping
//!
//! The board is a fixed `GRID_SIZE x GRID_SIZE` row-major array. Row 0 is the
//! top; tiles fall toward higher row indices. Every cell always holds exactly
//! one tile outside of `remove_and_compact`, which is the only routine that
//! changes tile identities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::{edge_adjacent, in_bounds};

/// Board coordinate (row 0 is the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Checked conversion from caller coordinates (which may be negative)
    pub fn checked(row: i64, col: i64) -> Option<Self> {
        in_bounds(row, col).then(|| Self::new(row as usize, col as usize))
    }

    /// Shares an edge with `other`
    pub fn is_adjacent(&self, other: Position) -> bool {
        edge_adjacent((self.row, self.col), (other.row, other.col))
    }

    /// Iterate every position in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable tile identity (survives swaps and falls, fresh on spawn)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Tile types: six ordinary donuts plus three power tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Strawberry,
    Vanilla,
    Lemon,
    Chocolate,
    Matcha,
    Soda,
    /// Gold tier: clears its row when caught in a blast
    RowClear,
    /// Silver tier: clears its column when caught in a blast
    ColClear,
    /// Rainbow: clears every tile of one kind
    Wildcard,
}

impl TileKind {
    /// Match-eligible kinds, in spawn order
    pub const ORDINARY: [TileKind; 6] = [
        TileKind::Strawberry,
        TileKind::Vanilla,
        TileKind::Lemon,
        TileKind::Chocolate,
        TileKind::Matcha,
        TileKind::Soda,
    ];

    /// Power tiles detonate instead of matching
    pub fn is_power(self) -> bool {
        matches!(self, TileKind::RowClear | TileKind::ColClear | TileKind::Wildcard)
    }

    pub fn is_ordinary(self) -> bool {
        !self.is_power()
    }

    /// One-character glyph for text boards
    pub fn glyph(self) -> char {
        match self {
            TileKind::Strawberry => 'S',
            TileKind::Vanilla => 'V',
            TileKind::Lemon => 'L',
            TileKind::Chocolate => 'C',
            TileKind::Matcha => 'M',
            TileKind::Soda => 'D',
            TileKind::RowClear => '=',
            TileKind::ColClear => '|',
            TileKind::Wildcard => '*',
        }
    }
}

/// A tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind) -> Self {
        Self { id, kind }
    }
}

/// Movement of one tile during compaction, for drop animations.
///
/// Spawned tiles start above the visible board (`from_row < 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    pub id: TileId,
    pub col: usize,
    pub from_row: i32,
    pub to_row: usize,
    pub spawned: bool,
}

/// Fixed-size tile grid, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Tile; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Build a grid by asking for the tile at each position (row-major order)
    pub fn from_fn(mut f: impl FnMut(Position) -> Tile) -> Self {
        let cells = std::array::from_fn(|row| std::array::from_fn(|col| f(Position::new(row, col))));
        Self { cells }
    }

    /// Tile at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells.get(pos.row).and_then(|r| r.get(pos.col))
    }

    /// Kind at `pos`, or `None` when out of bounds
    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.get(pos).map(|t| t.kind)
    }

    /// Exchange the tiles at two positions in place
    pub fn swap(&mut self, a: Position, b: Position) {
        if a == b || self.get(a).is_none() || self.get(b).is_none() {
            return;
        }
        let tile_a = self.cells[a.row][a.col];
        self.cells[a.row][a.col] = self.cells[b.row][b.col];
        self.cells[b.row][b.col] = tile_a;
    }

    /// Iterate `(position, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.cells.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, tile)| (Position::new(row, col), tile))
        })
    }

    /// Current position of a tile id (linear scan)
    #[cfg(test)]
    pub(crate) fn position_of(&self, id: TileId) -> Option<Position> {
        self.iter().find(|(_, t)| t.id == id).map(|(pos, _)| pos)
    }

    /// Remove the tiles at `removed_rows` in `col`, let survivors fall and
    /// fill the top with tiles from `spawn`.
    ///
    /// Survivors keep their relative order. `spawn` is called once per vacancy,
    /// bottom-most vacancy first.
    pub fn remove_and_compact(
        &mut self,
        col: usize,
        removed_rows: &[usize],
        mut spawn: impl FnMut() -> Tile,
    ) -> Vec<Fall> {
        let mut falls = Vec::new();
        if col >= GRID_SIZE || removed_rows.is_empty() {
            return falls;
        }

        // Walk bottom-up, packing survivors against the floor
        let mut write = GRID_SIZE;
        for row in (0..GRID_SIZE).rev() {
            if removed_rows.contains(&row) {
                continue;
            }
            write -= 1;
            let tile = self.cells[row][col];
            if write != row {
                falls.push(Fall {
                    id: tile.id,
                    col,
                    from_row: row as i32,
                    to_row: write,
                    spawned: false,
                });
            }
            self.cells[write][col] = tile;
        }

        let missing = write;
        for i in 0..missing {
            let target = missing - 1 - i;
            let tile = spawn();
            self.cells[target][col] = tile;
            falls.push(Fall {
                id: tile.id,
                col,
                from_row: target as i32 - GRID_SIZE as i32,
                to_row: target,
                spawned: true,
            });
        }

        falls
    }

    /// Row-major kinds, handy for assertions and snapshots
    pub fn kinds(&self) -> [[TileKind; GRID_SIZE]; GRID_SIZE] {
        self.cells.map(|row| row.map(|t| t.kind))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|t| t.kind.glyph())
                .flat_map(|g| [g, ' '])
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
