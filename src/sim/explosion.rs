//! Explosion expander and detonation footprints
//!
//! A blast is a worklist closure over the matched set: every power tile that
//! ends up in the set detonates exactly once, and anything its blast catches
//! is fed back into the worklist so chained detonations resolve fully.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position, TileId, TileKind};
use super::matcher::MatchSet;
use super::spawn::generate_ordinary;

/// Shape of a tap-activated power tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerTier {
    /// 3x3 neighbourhood
    Area,
    /// Own row and column
    Line,
    /// Row, column and both diagonals
    Ultimate,
}

impl PowerTier {
    /// Tap shape for a kind, `None` for ordinary tiles
    pub fn of(kind: TileKind) -> Option<Self> {
        match kind {
            TileKind::RowClear => Some(PowerTier::Area),
            TileKind::ColClear => Some(PowerTier::Line),
            TileKind::Wildcard => Some(PowerTier::Ultimate),
            _ => None,
        }
    }

    /// Does the shape centred on `origin` cover `pos`?
    pub fn covers(self, origin: Position, pos: Position) -> bool {
        let dr = origin.row.abs_diff(pos.row);
        let dc = origin.col.abs_diff(pos.col);
        match self {
            PowerTier::Area => dr <= 1 && dc <= 1,
            PowerTier::Line => dr == 0 || dc == 0,
            PowerTier::Ultimate => dr == 0 || dc == 0 || dr == dc,
        }
    }
}

/// One power tile going off during expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detonation {
    pub id: TileId,
    pub pos: Position,
    pub kind: TileKind,
    /// Kind a wildcard swept the board for
    pub target: Option<TileKind>,
}

/// Result of expanding a seed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub matched: MatchSet,
    /// In the order they fired
    pub detonations: Vec<Detonation>,
}

/// Close `seed` under every power tile's detonation rule.
///
/// Ids in `primed` count as already detonated (the tile that triggered the
/// action) and are not expanded again.
pub fn expand<R: Rng + ?Sized>(grid: &Grid, seed: &MatchSet, primed: &MatchSet, rng: &mut R) -> Expansion {
    let index: BTreeMap<TileId, (Position, TileKind)> =
        grid.iter().map(|(pos, t)| (t.id, (pos, t.kind))).collect();

    let mut matched = seed.clone();
    let mut checked = primed.clone();
    let mut detonations = Vec::new();
    let mut to_check: Vec<TileId> = seed.iter().copied().collect();

    while let Some(id) = to_check.pop() {
        if !checked.insert(id) {
            continue;
        }
        let Some(&(pos, kind)) = index.get(&id) else {
            continue;
        };

        let mut target = None;
        let caught: Vec<TileId> = match kind {
            TileKind::RowClear => grid
                .iter()
                .filter(|(p, _)| p.row == pos.row)
                .map(|(_, t)| t.id)
                .collect(),
            TileKind::ColClear => grid
                .iter()
                .filter(|(p, _)| p.col == pos.col)
                .map(|(_, t)| t.id)
                .collect(),
            TileKind::Wildcard => {
                let kind = generate_ordinary(rng);
                target = Some(kind);
                grid.iter()
                    .filter(|(_, t)| t.kind == kind)
                    .map(|(_, t)| t.id)
                    .collect()
            }
            _ => continue,
        };

        log::debug!("{:?} at {} detonated, caught {} tiles", kind, pos, caught.len());
        detonations.push(Detonation { id, pos, kind, target });

        for caught_id in caught {
            if matched.insert(caught_id) {
                to_check.push(caught_id);
            }
        }
    }

    Expansion { matched, detonations }
}

/// Footprint of tapping the power tile at `pos` (includes the tile itself).
///
/// `None` when `pos` is off the board or holds an ordinary tile.
pub fn activation_footprint(grid: &Grid, pos: Position) -> Option<MatchSet> {
    let tier = PowerTier::of(grid.kind_at(pos)?)?;
    Some(
        grid.iter()
            .filter(|(p, _)| tier.covers(pos, *p))
            .map(|(_, t)| t.id)
            .collect(),
    )
}

/// Seed for a wildcard swapped onto `other`: the wildcard plus every tile of
/// the other tile's kind, or the whole board when both are wildcards.
pub fn pairing_footprint(grid: &Grid, wildcard: Position, other: Position) -> MatchSet {
    let mut set = MatchSet::new();
    let (Some(wild), Some(partner)) = (grid.get(wildcard), grid.get(other)) else {
        return set;
    };
    set.insert(wild.id);

    let whole_board = partner.kind == TileKind::Wildcard;
    set.extend(
        grid.iter()
            .filter(|(_, t)| whole_board || t.kind == partner.kind)
            .map(|(_, t)| t.id),
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_SIZE;
    use crate::sim::grid::Tile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use TileKind::*;

    fn grid_with(overrides: &[(usize, usize, TileKind)]) -> Grid {
        Grid::from_fn(|pos| {
            let kind = overrides
                .iter()
                .find(|(r, c, _)| *r == pos.row && *c == pos.col)
                .map(|(_, _, k)| *k)
                .unwrap_or(TileKind::ORDINARY[(pos.row + 2 * pos.col) % 6]);
            Tile::new(TileId((pos.row * GRID_SIZE + pos.col) as u32), kind)
        })
    }

    fn id(row: usize, col: usize) -> TileId {
        TileId((row * GRID_SIZE + col) as u32)
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_ordinary_seed_is_unchanged() {
        let grid = grid_with(&[]);
        let seed: MatchSet = [id(0, 0), id(0, 1), id(0, 2)].into_iter().collect();
        let out = expand(&grid, &seed, &MatchSet::new(), &mut rng());
        assert_eq!(out.matched, seed);
        assert!(out.detonations.is_empty());
    }

    #[test]
    fn test_row_clear_takes_whole_row() {
        let grid = grid_with(&[(3, 2, RowClear)]);
        let seed: MatchSet = [id(3, 2)].into_iter().collect();
        let out = expand(&grid, &seed, &MatchSet::new(), &mut rng());
        assert_eq!(out.matched.len(), GRID_SIZE);
        assert!((0..GRID_SIZE).all(|c| out.matched.contains(&id(3, c))));
    }

    #[test]
    fn test_chained_row_then_column() {
        // RowClear in row 1 catches a ColClear at (1, 4)
        let grid = grid_with(&[(1, 0, RowClear), (1, 4, ColClear)]);
        let seed: MatchSet = [id(1, 0)].into_iter().collect();
        let out = expand(&grid, &seed, &MatchSet::new(), &mut rng());

        assert!((0..GRID_SIZE).all(|c| out.matched.contains(&id(1, c))));
        assert!((0..GRID_SIZE).all(|r| out.matched.contains(&id(r, 4))));
        assert_eq!(out.matched.len(), 2 * GRID_SIZE - 1);
        assert_eq!(out.detonations.len(), 2);
    }

    #[test]
    fn test_each_power_tile_fires_once() {
        // Two RowClears in the same row catch each other
        let grid = grid_with(&[(2, 0, RowClear), (2, 5, RowClear)]);
        let seed: MatchSet = [id(2, 0), id(2, 5)].into_iter().collect();
        let out = expand(&grid, &seed, &MatchSet::new(), &mut rng());
        assert_eq!(out.detonations.len(), 2);
        assert_eq!(out.matched.len(), GRID_SIZE);
    }

    #[test]
    fn test_primed_tile_does_not_fire() {
        let grid = grid_with(&[(0, 0, ColClear)]);
        let seed: MatchSet = [id(0, 0), id(0, 1)].into_iter().collect();
        let out = expand(&grid, &seed, &seed, &mut rng());
        assert_eq!(out.matched, seed);
        assert!(out.detonations.is_empty());
    }

    #[test]
    fn test_wildcard_sweeps_one_ordinary_kind() {
        let grid = grid_with(&[(4, 4, Wildcard)]);
        let seed: MatchSet = [id(4, 4)].into_iter().collect();
        let out = expand(&grid, &seed, &MatchSet::new(), &mut rng());

        let target = out.detonations[0].target.expect("wildcard picks a kind");
        assert!(target.is_ordinary());
        for (_, tile) in grid.iter() {
            if tile.kind == target {
                assert!(out.matched.contains(&tile.id));
            }
        }
    }

    #[test]
    fn test_area_footprint_is_clipped_3x3() {
        let grid = grid_with(&[(0, 0, RowClear)]);
        let set = activation_footprint(&grid, Position::new(0, 0)).unwrap();
        let expected: MatchSet = [id(0, 0), id(0, 1), id(1, 0), id(1, 1)].into_iter().collect();
        assert_eq!(set, expected);

        let grid = grid_with(&[(2, 2, RowClear)]);
        assert_eq!(activation_footprint(&grid, Position::new(2, 2)).unwrap().len(), 9);
    }

    #[test]
    fn test_line_footprint_is_row_and_column() {
        let grid = grid_with(&[(2, 3, ColClear)]);
        let set = activation_footprint(&grid, Position::new(2, 3)).unwrap();
        assert_eq!(set.len(), 2 * GRID_SIZE - 1);
    }

    #[test]
    fn test_ultimate_footprint_adds_diagonals() {
        let grid = grid_with(&[(0, 0, Wildcard)]);
        let set = activation_footprint(&grid, Position::new(0, 0)).unwrap();
        // row + column + main diagonal, corner shared
        assert_eq!(set.len(), 3 * GRID_SIZE - 2);
        assert!(set.contains(&id(5, 5)));
    }

    #[test]
    fn test_ordinary_tile_has_no_footprint() {
        let grid = grid_with(&[]);
        assert_eq!(activation_footprint(&grid, Position::new(1, 1)), None);
        assert_eq!(activation_footprint(&grid, Position::new(9, 9)), None);
    }

    #[test]
    fn test_pairing_collects_partner_kind() {
        let grid = grid_with(&[(0, 0, Wildcard)]);
        let partner = grid.kind_at(Position::new(0, 1)).unwrap();
        let set = pairing_footprint(&grid, Position::new(0, 0), Position::new(0, 1));

        assert!(set.contains(&id(0, 0)));
        let same_kind = grid.iter().filter(|(_, t)| t.kind == partner).count();
        assert_eq!(set.len(), same_kind + 1);
    }

    #[test]
    fn test_double_wildcard_pairing_takes_board() {
        let grid = grid_with(&[(0, 0, Wildcard), (0, 1, Wildcard)]);
        let set = pairing_footprint(&grid, Position::new(0, 0), Position::new(0, 1));
        assert_eq!(set.len(), GRID_SIZE * GRID_SIZE);
    }
}
