//! Board rules and presentation pacing
//!
//! Stored as JSON next to the host application. Everything here has a
//! sensible default, so a missing file simply means default rules.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{CascadePhase, SpawnRates};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spawn rates must be non-negative and sum below 1 (got {0:?})")]
    InvalidRates(SpawnRates),
}

/// Pacing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PacePreset {
    /// No delays (headless, tests, replays)
    Instant,
    Brisk,
    #[default]
    Relaxed,
}

impl PacePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacePreset::Instant => "Instant",
            PacePreset::Brisk => "Brisk",
            PacePreset::Relaxed => "Relaxed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "instant" | "headless" => Some(PacePreset::Instant),
            "brisk" | "fast" => Some(PacePreset::Brisk),
            "relaxed" => Some(PacePreset::Relaxed),
            _ => None,
        }
    }
}

/// Delays a presentation layer inserts between resolver transitions.
///
/// These carry no simulation meaning; the resolver itself never waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Matched tiles linger before they are removed
    pub pre_clear_linger_ms: u64,
    /// Fallen tiles settle before the next detection
    pub settle_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_preset(PacePreset::default())
    }
}

impl Pacing {
    pub fn from_preset(preset: PacePreset) -> Self {
        match preset {
            PacePreset::Instant => Self {
                pre_clear_linger_ms: 0,
                settle_ms: 0,
            },
            PacePreset::Brisk => Self {
                pre_clear_linger_ms: 150,
                settle_ms: 20,
            },
            PacePreset::Relaxed => Self {
                pre_clear_linger_ms: 350,
                settle_ms: 250,
            },
        }
    }

    /// How long to wait before running the work of `phase`
    pub fn delay_before(&self, phase: CascadePhase) -> Duration {
        match phase {
            CascadePhase::Compacting => Duration::from_millis(self.pre_clear_linger_ms),
            CascadePhase::Detecting => Duration::from_millis(self.settle_ms),
            _ => Duration::ZERO,
        }
    }
}

/// Board rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Power tile odds for refills
    pub spawn: SpawnRates,
    /// Redraws per cell while building the starting board
    pub initial_fill_attempts: u32,
    /// Clear size that triggers the big-clear cue
    pub big_clear_tiles: usize,
    /// Combo index that triggers the big-clear cue
    pub big_clear_combo: u32,
    pub pacing: Pacing,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            spawn: SpawnRates::default(),
            initial_fill_attempts: INITIAL_FILL_ATTEMPTS,
            big_clear_tiles: BIG_CLEAR_TILES,
            big_clear_combo: BIG_CLEAR_COMBO,
            pacing: Pacing::default(),
        }
    }
}

impl Rules {
    /// Default rules with no presentation delays
    pub fn headless() -> Self {
        Self {
            pacing: Pacing::from_preset(PacePreset::Instant),
            ..Self::default()
        }
    }

    /// Is a clear of `count` tiles at `combo_index` a big clear?
    pub fn is_big_clear(&self, count: usize, combo_index: u32) -> bool {
        count >= self.big_clear_tiles || combo_index >= self.big_clear_combo
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.spawn.is_valid() {
            return Err(SettingsError::InvalidRates(self.spawn));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a JSON file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No rules file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&json)?;
        log::info!("Loaded rules from {}", path.display());
        Ok(rules)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Rules saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in [PacePreset::Instant, PacePreset::Brisk, PacePreset::Relaxed] {
            assert_eq!(PacePreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(PacePreset::from_str("headless"), Some(PacePreset::Instant));
        assert_eq!(PacePreset::from_str("warp"), None);
    }

    #[test]
    fn test_pacing_delays_by_phase() {
        let pacing = Pacing::from_preset(PacePreset::Relaxed);
        assert_eq!(pacing.delay_before(CascadePhase::Compacting), Duration::from_millis(350));
        assert_eq!(pacing.delay_before(CascadePhase::Detecting), Duration::from_millis(250));
        assert_eq!(pacing.delay_before(CascadePhase::Expanding), Duration::ZERO);

        let instant = Rules::headless().pacing;
        assert_eq!(instant.delay_before(CascadePhase::Compacting), Duration::ZERO);
    }

    #[test]
    fn test_big_clear_thresholds() {
        let rules = Rules::default();
        assert!(!rules.is_big_clear(3, 0));
        assert!(rules.is_big_clear(5, 0));
        assert!(rules.is_big_clear(3, 2));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let rules = Rules::from_json(r#"{ "big_clear_tiles": 7 }"#).unwrap();
        assert_eq!(rules.big_clear_tiles, 7);
        assert_eq!(rules.initial_fill_attempts, INITIAL_FILL_ATTEMPTS);
        assert_eq!(rules.spawn, SpawnRates::default());
    }

    #[test]
    fn test_partial_nested_json_uses_defaults() {
        let rules = Rules::from_json(r#"{ "pacing": { "settle_ms": 10 }, "spawn": { "wildcard": 0.01 } }"#).unwrap();
        assert_eq!(rules.pacing.settle_ms, 10);
        assert_eq!(rules.pacing.pre_clear_linger_ms, Pacing::default().pre_clear_linger_ms);
        assert_eq!(rules.spawn.wildcard, 0.01);
        assert_eq!(rules.spawn.row_clear, ROW_CLEAR_SPAWN_RATE);
        assert_eq!(rules.spawn.col_clear, COL_CLEAR_SPAWN_RATE);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let err = Rules::from_json(r#"{ "spawn": { "wildcard": 0.9, "row_clear": 0.2, "col_clear": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidRates(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("mochi_rules_{}.json", std::process::id()));
        let mut rules = Rules::headless();
        rules.initial_fill_attempts = 4;
        rules.save(&path).unwrap();

        let loaded = Rules::load(&path).unwrap();
        assert_eq!(loaded, rules);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("mochi_rules_does_not_exist.json");
        assert_eq!(Rules::load(&path).unwrap(), Rules::default());
    }
}
