//! Tile generator
//!
//! Pure functions of the RNG. Initial fills only ever see ordinary tiles;
//! mid-game refills roll for power tiles first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::TileKind;
use crate::consts::*;

/// Per-refill spawn probabilities for power tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRates {
    pub wildcard: f64,
    /// Gold tier
    pub row_clear: f64,
    /// Silver tier
    pub col_clear: f64,
}

impl Default for SpawnRates {
    fn default() -> Self {
        Self {
            wildcard: WILDCARD_SPAWN_RATE,
            row_clear: ROW_CLEAR_SPAWN_RATE,
            col_clear: COL_CLEAR_SPAWN_RATE,
        }
    }
}

impl SpawnRates {
    /// No power tiles at all
    pub const NONE: SpawnRates = SpawnRates {
        wildcard: 0.0,
        row_clear: 0.0,
        col_clear: 0.0,
    };

    /// Combined chance that a refill is a power tile
    pub fn power_total(&self) -> f64 {
        self.wildcard + self.row_clear + self.col_clear
    }

    /// Every rate is a probability and together they leave room for ordinary tiles
    pub fn is_valid(&self) -> bool {
        let rates = [self.wildcard, self.row_clear, self.col_clear];
        rates.iter().all(|r| r.is_finite() && *r >= 0.0) && self.power_total() < 1.0
    }
}

/// Uniform draw over the six ordinary kinds
pub fn generate_ordinary<R: Rng + ?Sized>(rng: &mut R) -> TileKind {
    TileKind::ORDINARY[rng.random_range(0..TileKind::ORDINARY.len())]
}

/// Weighted draw used for refills: wildcard, then gold, then silver,
/// falling through to a uniform ordinary kind
pub fn generate_with_rarity<R: Rng + ?Sized>(rng: &mut R, rates: &SpawnRates) -> TileKind {
    let roll: f64 = rng.random();

    if roll < rates.wildcard {
        return TileKind::Wildcard;
    }
    if roll < rates.wildcard + rates.row_clear {
        return TileKind::RowClear;
    }
    if roll < rates.power_total() {
        return TileKind::ColClear;
    }

    generate_ordinary(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ordinary_never_power() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            assert!(generate_ordinary(&mut rng).is_ordinary());
        }
    }

    #[test]
    fn test_ordinary_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let kind = generate_ordinary(&mut rng);
            let idx = TileKind::ORDINARY.iter().position(|k| *k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_rarity_with_zero_rates_is_ordinary() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..2000 {
            assert!(generate_with_rarity(&mut rng, &SpawnRates::NONE).is_ordinary());
        }
    }

    #[test]
    fn test_rarity_weights_roughly_respected() {
        let mut rng = Pcg32::seed_from_u64(12345);
        let rates = SpawnRates {
            wildcard: 0.1,
            row_clear: 0.1,
            col_clear: 0.1,
        };
        let draws = 20_000;
        let power = (0..draws)
            .filter(|_| generate_with_rarity(&mut rng, &rates).is_power())
            .count();
        let share = power as f64 / draws as f64;
        assert!((share - 0.3).abs() < 0.03, "power share {share}");
    }

    #[test]
    fn test_rate_validation() {
        assert!(SpawnRates::default().is_valid());
        assert!(SpawnRates::NONE.is_valid());
        let bad = SpawnRates {
            wildcard: 0.5,
            row_clear: 0.5,
            col_clear: 0.1,
        };
        assert!(!bad.is_valid());
        let negative = SpawnRates {
            wildcard: -0.1,
            ..SpawnRates::default()
        };
        assert!(!negative.is_valid());
    }
}
