//! Mochi Match - a donut-themed match-3 board engine
//!
//! Core modules:
//! - `sim`: Deterministic board simulation (matching, power tiles, cascades)
//! - `feedback`: Side-effect port the caller injects for events and cues
//! - `settings`: Data-driven rules and presentation pacing
//! - `web`: Browser binding (wasm32 only)

pub mod feedback;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use feedback::{BoardPort, Cue, NullPort, Recorder};
pub use settings::{PacePreset, Pacing, Rules, SettingsError};
pub use sim::{BoardEvent, BoardInput, CascadeSummary, Controller, InvalidMove, Position, TileKind};

/// Game configuration constants
pub mod consts {
    /// Board is always GRID_SIZE x GRID_SIZE
    pub const GRID_SIZE: usize = 6;
    /// Shortest straight run that counts as a match
    pub const MIN_RUN: usize = 3;
    /// Redraws allowed per cell when avoiding runs in the starting board
    pub const INITIAL_FILL_ATTEMPTS: u32 = 10;

    /// Refill spawn probabilities (remainder is a uniform ordinary tile)
    pub const WILDCARD_SPAWN_RATE: f64 = 0.002;
    /// Gold tier
    pub const ROW_CLEAR_SPAWN_RATE: f64 = 0.004;
    /// Silver tier
    pub const COL_CLEAR_SPAWN_RATE: f64 = 0.007;

    /// Clears at or above this size get the big-clear treatment
    pub const BIG_CLEAR_TILES: usize = 5;
    /// Combo index at or above which every clear is a big clear
    pub const BIG_CLEAR_COMBO: u32 = 2;
}

/// True if `(row, col)` lies on the board
#[inline]
pub fn in_bounds(row: i64, col: i64) -> bool {
    let n = consts::GRID_SIZE as i64;
    (0..n).contains(&row) && (0..n).contains(&col)
}

/// True if two cells share an edge (4-neighbourhood)
#[inline]
pub fn edge_adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}
