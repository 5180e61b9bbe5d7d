//! Swap / activation controller
//!
//! The only entry point that mutates a board. Validates caller input, applies
//! swaps, seeds tap and wildcard detonations, and owns the cascade so that
//! at most one is ever in flight.

use serde::{Deserialize, Serialize};

use super::cascade::{Cascade, CascadePhase};
use super::event::{BoardEvent, CascadeSummary, InvalidMove};
use super::explosion::{PowerTier, activation_footprint, pairing_footprint};
use super::grid::{Position, TileKind};
use super::matcher::{MatchSet, find_hint, find_matches};
use super::state::Board;
use crate::feedback::{BoardPort, Cue, NullPort};
use crate::settings::Rules;

/// One discrete request from the caller (coordinates may be off the board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardInput {
    Swap { from: (i64, i64), to: (i64, i64) },
    Activate { at: (i64, i64) },
    Reset { seed: u64 },
}

/// Board, resolver and side-effect port for one game session
#[derive(Debug)]
pub struct Controller<P: BoardPort = NullPort> {
    board: Board,
    cascade: Cascade,
    rules: Rules,
    port: P,
}

impl<P: BoardPort> Controller<P> {
    /// New session with a freshly generated board
    pub fn new(seed: u64, rules: Rules, port: P) -> Self {
        let board = Board::new(seed, rules.initial_fill_attempts);
        log::info!("Board created with seed {}", seed);
        Self::with_board(board, rules, port)
    }

    /// Session around an existing board
    pub fn with_board(board: Board, rules: Rules, port: P) -> Self {
        Self {
            board,
            cascade: Cascade::idle(),
            rules,
            port,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn phase(&self) -> CascadePhase {
        self.cascade.phase()
    }

    /// True while a cascade is in flight; every request is rejected meanwhile
    pub fn is_processing(&self) -> bool {
        self.cascade.is_active()
    }

    /// Total tiles cleared this session
    pub fn clear_count(&self) -> u64 {
        self.board.total_cleared()
    }

    /// A swap that would match right now, if any
    pub fn hint(&self) -> Option<(Position, Position)> {
        find_hint(self.board.grid())
    }

    /// Apply one request. Returns whether a cascade is now in flight.
    pub fn apply(&mut self, input: &BoardInput) -> Result<bool, InvalidMove> {
        match *input {
            BoardInput::Swap { from, to } => self.swap(from, to),
            BoardInput::Activate { at } => self.activate(at).map(|_| true),
            BoardInput::Reset { seed } => {
                self.reset(seed);
                Ok(false)
            }
        }
    }

    /// Swap two adjacent tiles.
    ///
    /// A swap that makes no match stands as-is and starts nothing (`Ok(false)`).
    /// Swapping a wildcard with anything seeds a pairing detonation instead.
    pub fn swap(&mut self, from: (i64, i64), to: (i64, i64)) -> Result<bool, InvalidMove> {
        if self.is_processing() {
            return Err(self.reject(InvalidMove::Busy));
        }
        let a = self.locate(from)?;
        let b = self.locate(to)?;
        if !a.is_adjacent(b) {
            return Err(self.reject(InvalidMove::NotAdjacent));
        }

        let grid = self.board.grid();
        let (Some(kind_a), Some(kind_b)) = (grid.kind_at(a), grid.kind_at(b)) else {
            return Err(self.reject(InvalidMove::OutOfBounds { row: from.0, col: from.1 }));
        };

        self.port.cue(Cue::Swap);
        self.board.swap(a, b);
        log::debug!("Swapped {} <-> {}", a, b);

        if kind_a == TileKind::Wildcard || kind_b == TileKind::Wildcard {
            // Tiles have traded places: the wildcard now sits where the other tile was
            let (wild_at, other_at) = if kind_a == TileKind::Wildcard { (b, a) } else { (a, b) };
            self.start_pairing(wild_at, other_at);
            return Ok(true);
        }

        if find_matches(self.board.grid()).is_empty() {
            return Ok(false);
        }
        self.cascade = Cascade::detect();
        Ok(true)
    }

    /// Tap a power tile to detonate its footprint
    pub fn activate(&mut self, at: (i64, i64)) -> Result<(), InvalidMove> {
        if self.is_processing() {
            return Err(self.reject(InvalidMove::Busy));
        }
        let pos = self.locate(at)?;
        let Some(tile) = self.board.grid().get(pos).copied() else {
            return Err(self.reject(InvalidMove::OutOfBounds { row: at.0, col: at.1 }));
        };
        let (Some(tier), Some(footprint)) = (PowerTier::of(tile.kind), activation_footprint(self.board.grid(), pos))
        else {
            return Err(self.reject(InvalidMove::NotPowerTile {
                row: pos.row,
                col: pos.col,
            }));
        };

        match tier {
            PowerTier::Area | PowerTier::Line => self.port.cue(Cue::Bomb),
            PowerTier::Ultimate => self.port.cue(Cue::FeverStart),
        }
        self.port.cue(Cue::Shake);
        self.port.cue(Cue::BigClear);
        log::debug!("Activated {:?} at {} ({} tiles)", tile.kind, pos, footprint.len());

        let primed: MatchSet = [tile.id].into_iter().collect();
        self.cascade = Cascade::detonate(footprint, primed);
        Ok(())
    }

    /// Discard the board (and any cascade in flight) and deal a new one
    pub fn reset(&mut self, seed: u64) {
        if self.is_processing() {
            log::info!("Reset discarded a cascade in {:?}", self.phase());
        }
        self.cascade = Cascade::idle();
        self.board = Board::new(seed, self.rules.initial_fill_attempts);
        log::info!("Board reset with seed {}", seed);
    }

    /// Run one resolver transition. Returns the phase now pending.
    pub fn advance(&mut self) -> CascadePhase {
        self.cascade.advance(&mut self.board, &self.rules, &mut self.port)
    }

    /// Run the in-flight cascade to completion
    pub fn run_to_idle(&mut self) -> CascadeSummary {
        self.cascade.run_to_idle(&mut self.board, &self.rules, &mut self.port)
    }

    /// Swap and resolve everything it sets off. `Ok(None)` if nothing matched.
    pub fn request_swap(&mut self, from: (i64, i64), to: (i64, i64)) -> Result<Option<CascadeSummary>, InvalidMove> {
        let started = self.swap(from, to)?;
        Ok(started.then(|| self.run_to_idle()))
    }

    /// Tap and resolve everything it sets off
    pub fn request_activate(&mut self, at: (i64, i64)) -> Result<CascadeSummary, InvalidMove> {
        self.activate(at)?;
        Ok(self.run_to_idle())
    }

    /// Resolve whatever matches the board currently holds
    pub fn resolve(&mut self) -> Result<CascadeSummary, InvalidMove> {
        if self.is_processing() {
            return Err(self.reject(InvalidMove::Busy));
        }
        self.cascade = Cascade::detect();
        Ok(self.run_to_idle())
    }

    fn start_pairing(&mut self, wild_at: Position, other_at: Position) {
        let grid = self.board.grid();
        let seed = pairing_footprint(grid, wild_at, other_at);
        let mut primed = MatchSet::new();
        let mut both_wild = false;
        if let (Some(wild), Some(other)) = (grid.get(wild_at), grid.get(other_at)) {
            primed.insert(wild.id);
            if other.kind == TileKind::Wildcard {
                primed.insert(other.id);
                both_wild = true;
            }
        }

        self.port.cue(Cue::FeverStart);
        if both_wild {
            self.port.cue(Cue::Shake);
            self.port.cue(Cue::Win);
        }
        log::debug!("Wildcard pairing at {} caught {} tiles", wild_at, seed.len());
        self.cascade = Cascade::detonate(seed, primed);
    }

    fn locate(&mut self, (row, col): (i64, i64)) -> Result<Position, InvalidMove> {
        Position::checked(row, col).ok_or_else(|| self.reject(InvalidMove::OutOfBounds { row, col }))
    }

    fn reject(&mut self, reason: InvalidMove) -> InvalidMove {
        log::debug!("Rejected move: {}", reason);
        self.port.emit(&BoardEvent::InvalidMove { reason });
        reason
    }
}
