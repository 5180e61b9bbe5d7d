//! Outbound events and rejected-move reasons

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Fall, Grid, Position, TileId, TileKind};

/// Why a swap or tap was ignored. Never fatal: the caller drops the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvalidMove {
    #[error("a cascade is still resolving")]
    Busy,
    #[error("position ({row}, {col}) is off the board")]
    OutOfBounds { row: i64, col: i64 },
    #[error("tiles are not edge-adjacent")]
    NotAdjacent,
    #[error("tile at ({row}, {col}) is not a power tile")]
    NotPowerTile { row: usize, col: usize },
}

/// A tile removed by a clear step, for particle placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedTile {
    pub id: TileId,
    pub pos: Position,
    pub kind: TileKind,
}

/// Totals for one full cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub total_cleared: usize,
    pub max_combo_index: u32,
    /// Number of clear steps (0 if nothing matched)
    pub steps: u32,
}

/// Event stream emitted to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    TilesCleared {
        /// Row-major order
        tiles: Vec<ClearedTile>,
        combo_index: u32,
        total_count: usize,
        /// Anchor for floating combo text
        pivot: Position,
        caption: String,
    },
    BoardSettled {
        grid: Grid,
        falls: Vec<Fall>,
    },
    CascadeFinished(CascadeSummary),
    InvalidMove {
        reason: InvalidMove,
    },
}

impl BoardEvent {
    pub fn is_clear(&self) -> bool {
        matches!(self, BoardEvent::TilesCleared { .. })
    }
}
