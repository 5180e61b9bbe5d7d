//! Deterministic board simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by the board)
//! - Stable iteration order (row-major cells, ordered ID sets)
//! - No timers, audio or rendering; side effects go through a `BoardPort`

pub mod cascade;
pub mod controller;
pub mod event;
pub mod explosion;
pub mod grid;
pub mod matcher;
pub mod spawn;
pub mod state;

pub use cascade::{COMBO_PHRASES, Cascade, CascadePhase};
pub use controller::{BoardInput, Controller};
pub use event::{BoardEvent, CascadeSummary, ClearedTile, InvalidMove};
pub use explosion::{Detonation, Expansion, PowerTier, activation_footprint, expand, pairing_footprint};
pub use grid::{Fall, Grid, Position, Tile, TileId, TileKind};
pub use matcher::{MatchSet, find_hint, find_matches};
pub use spawn::{SpawnRates, generate_ordinary, generate_with_rarity};
pub use state::Board;
