//! Cascade resolver
//!
//! Explicit state machine for one triggering action:
//!
//! ```text
//! Idle -> Detecting -> Expanding -> Clearing -> Compacting -> Detecting ...
//!            |
//!            +-> Idle (nothing matched)
//! ```
//!
//! Each call to [`Cascade::advance`] performs the work of exactly one phase,
//! so a presentation layer can pause between transitions. Headless callers
//! use [`Cascade::run_to_idle`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::{BoardEvent, CascadeSummary, ClearedTile};
use super::grid::{Position, TileKind};
use super::matcher::{MatchSet, find_matches};
use super::state::Board;
use crate::feedback::{BoardPort, Cue};
use crate::settings::Rules;

/// Captions for a first-step clear
pub const COMBO_PHRASES: [&str; 8] = [
    "YUMMY!", "MOCHI!", "OISHI!", "GREAT!", "WOW!", "AMAZING!", "BONUS!", "COMBO!",
];

/// Resolver phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CascadePhase {
    #[default]
    Idle,
    /// Looking for runs on the settled board
    Detecting,
    /// Growing the seed through power tile detonations
    Expanding,
    /// Reporting the matched tiles
    Clearing,
    /// Removing matched tiles, dropping survivors, refilling
    Compacting,
}

/// In-flight cascade for one board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cascade {
    phase: CascadePhase,
    combo_index: u32,
    seed: MatchSet,
    /// Power tiles that already went off as part of the triggering action
    primed: MatchSet,
    matched: MatchSet,
    summary: CascadeSummary,
}

impl Cascade {
    /// Nothing in flight
    pub fn idle() -> Self {
        Self::default()
    }

    /// Start by scanning the board for runs
    pub fn detect() -> Self {
        Self {
            phase: CascadePhase::Detecting,
            ..Self::default()
        }
    }

    /// Start from a ready-made seed (tap or wildcard pairing), skipping detection
    pub fn detonate(seed: MatchSet, primed: MatchSet) -> Self {
        Self {
            phase: CascadePhase::Expanding,
            seed,
            primed,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != CascadePhase::Idle
    }

    /// Zero-based index of the step currently being resolved
    pub fn combo_index(&self) -> u32 {
        self.combo_index
    }

    /// Totals so far
    pub fn summary(&self) -> CascadeSummary {
        self.summary
    }

    /// Do the work of the current phase and move to the next one
    pub fn advance<P: BoardPort + ?Sized>(&mut self, board: &mut Board, rules: &Rules, port: &mut P) -> CascadePhase {
        match self.phase {
            CascadePhase::Idle => {}
            CascadePhase::Detecting => {
                let found = find_matches(board.grid());
                if found.is_empty() {
                    self.finish(port);
                } else {
                    log::debug!("Combo {}: detected {} matched tiles", self.combo_index, found.len());
                    self.seed = found;
                    self.primed.clear();
                    self.phase = CascadePhase::Expanding;
                }
            }
            CascadePhase::Expanding => {
                let expansion = board.detonate(&self.seed, &self.primed);
                for det in &expansion.detonations {
                    if matches!(det.kind, TileKind::RowClear | TileKind::ColClear) {
                        port.cue(Cue::Bomb);
                    }
                }
                self.matched = expansion.matched;
                self.phase = if self.matched.is_empty() {
                    CascadePhase::Detecting
                } else {
                    CascadePhase::Clearing
                };
            }
            CascadePhase::Clearing => {
                self.clear(board, rules, port);
                self.phase = CascadePhase::Compacting;
            }
            CascadePhase::Compacting => {
                let falls = board.clear_and_refill(&self.matched, &rules.spawn);
                log::debug!("Combo {}: {} tiles moved", self.combo_index, falls.len());
                port.emit(&BoardEvent::BoardSettled {
                    grid: board.grid().clone(),
                    falls,
                });
                self.seed.clear();
                self.primed.clear();
                self.matched.clear();
                self.combo_index += 1;
                self.phase = CascadePhase::Detecting;
            }
        }
        self.phase
    }

    /// Advance until the cascade ends
    pub fn run_to_idle<P: BoardPort + ?Sized>(&mut self, board: &mut Board, rules: &Rules, port: &mut P) -> CascadeSummary {
        while self.is_active() {
            self.advance(board, rules, port);
        }
        self.summary
    }

    fn clear<P: BoardPort + ?Sized>(&mut self, board: &mut Board, rules: &Rules, port: &mut P) {
        let tiles: Vec<ClearedTile> = board
            .grid()
            .iter()
            .filter(|(_, t)| self.matched.contains(&t.id))
            .map(|(pos, t)| ClearedTile {
                id: t.id,
                pos,
                kind: t.kind,
            })
            .collect();
        let count = tiles.len();
        let pivot = tiles.first().map(|t| t.pos).unwrap_or(Position::new(0, 0));
        let caption = if self.combo_index > 0 {
            format!("{} COMBO!", self.combo_index + 1)
        } else {
            let pick = board.rng_mut().random_range(0..COMBO_PHRASES.len());
            COMBO_PHRASES[pick].to_string()
        };

        port.cue(Cue::Match {
            combo_index: self.combo_index,
        });
        if rules.is_big_clear(count, self.combo_index) {
            port.cue(Cue::BigClear);
            port.cue(Cue::Shake);
        }

        self.summary.total_cleared += count;
        self.summary.max_combo_index = self.combo_index;
        self.summary.steps += 1;

        port.emit(&BoardEvent::TilesCleared {
            tiles,
            combo_index: self.combo_index,
            total_count: count,
            pivot,
            caption,
        });
    }

    fn finish<P: BoardPort + ?Sized>(&mut self, port: &mut P) {
        self.phase = CascadePhase::Idle;
        log::info!(
            "Cascade finished: {} tiles over {} steps",
            self.summary.total_cleared,
            self.summary.steps
        );
        port.emit(&BoardEvent::CascadeFinished(self.summary));
    }
}
