//! Board state
//!
//! Owns the grid together with everything needed to evolve it
//! deterministically: the seeded RNG, the tile id allocator and the running
//! clear tally.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::explosion::{Expansion, expand};
use super::grid::{Fall, Grid, Position, Tile, TileId, TileKind};
use super::matcher::{MatchSet, creates_initial_run};
use super::spawn::{SpawnRates, generate_ordinary, generate_with_rarity};
use crate::consts::GRID_SIZE;

/// Complete board state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Seed the current fill was generated from
    pub seed: u64,
    grid: Grid,
    rng: Pcg32,
    next_id: u32,
    /// Tiles cleared since the last reset
    total_cleared: u64,
    /// Kinds handed to refills before the RNG is consulted
    #[serde(default)]
    scripted: VecDeque<TileKind>,
}

impl Board {
    /// Fresh board with a starting fill of ordinary tiles
    pub fn new(seed: u64, fill_attempts: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let kinds = initial_kinds(&mut rng, fill_attempts);
        Self::assemble(seed, rng, kinds)
    }

    /// Board with an exact layout (puzzles, tests, replays)
    pub fn from_kinds(seed: u64, kinds: [[TileKind; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self::assemble(seed, Pcg32::seed_from_u64(seed), kinds)
    }

    fn assemble(seed: u64, rng: Pcg32, kinds: [[TileKind; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut next_id = 1;
        let grid = Grid::from_fn(|pos| {
            let id = TileId(next_id);
            next_id += 1;
            Tile::new(id, kinds[pos.row][pos.col])
        });
        Self {
            seed,
            grid,
            rng,
            next_id,
            total_cleared: 0,
            scripted: VecDeque::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Tiles cleared since the board was created
    pub fn total_cleared(&self) -> u64 {
        self.total_cleared
    }

    /// Queue kinds for upcoming refills (consumed before any random draw)
    pub fn script_spawns(&mut self, kinds: impl IntoIterator<Item = TileKind>) {
        self.scripted.extend(kinds);
    }

    pub(crate) fn swap(&mut self, a: Position, b: Position) {
        self.grid.swap(a, b);
    }

    /// Run the explosion expander on the current grid with the board RNG
    pub fn detonate(&mut self, seed: &MatchSet, primed: &MatchSet) -> Expansion {
        expand(&self.grid, seed, primed, &mut self.rng)
    }

    /// Remove every tile in `cleared`, compact each column and refill from
    /// the top. Returns the resulting tile movements.
    pub(crate) fn clear_and_refill(&mut self, cleared: &MatchSet, rates: &SpawnRates) -> Vec<Fall> {
        let mut removed: [Vec<usize>; GRID_SIZE] = Default::default();
        for (pos, tile) in self.grid.iter() {
            if cleared.contains(&tile.id) {
                removed[pos.col].push(pos.row);
            }
        }

        let Board {
            grid,
            rng,
            next_id,
            scripted,
            total_cleared,
            ..
        } = self;

        let mut falls = Vec::new();
        for (col, rows) in removed.iter().enumerate() {
            *total_cleared += rows.len() as u64;
            falls.extend(grid.remove_and_compact(col, rows, || {
                let kind = scripted
                    .pop_front()
                    .unwrap_or_else(|| generate_with_rarity(&mut *rng, rates));
                let id = TileId(*next_id);
                *next_id += 1;
                Tile::new(id, kind)
            }));
        }
        falls
    }
}

/// Row-major starting fill: redraw a kind (up to `attempts` times) while it
/// would finish a run with the two tiles left of it or above it
fn initial_kinds(rng: &mut Pcg32, attempts: u32) -> [[TileKind; GRID_SIZE]; GRID_SIZE] {
    let mut kinds = [[TileKind::Strawberry; GRID_SIZE]; GRID_SIZE];
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let mut kind = generate_ordinary(rng);
            let mut tries = 0;
            while tries < attempts && creates_initial_run(&kinds, row, col, kind) {
                kind = generate_ordinary(rng);
                tries += 1;
            }
            if tries == attempts && creates_initial_run(&kinds, row, col, kind) {
                log::debug!("Initial fill kept a run at ({}, {}) after {} redraws", row, col, attempts);
            }
            kinds[row][col] = kind;
        }
    }
    kinds
}
