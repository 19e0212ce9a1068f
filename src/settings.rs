//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ALIEN_FIRE_INTERVAL_MS, MAX_PLAYER_SHOTS, STARTING_LIVES};

/// Errors from reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (firing columns, bonus awards)
    pub seed: u64,
    /// Lives at the start of a game (1-3, one HUD slot each)
    pub starting_lives: u8,
    /// Player shots allowed in flight
    pub max_player_shots: usize,
    /// Minimum gap between alien shots
    pub alien_fire_interval_ms: u64,

    // === Headless driver ===
    /// Simulated run length
    pub run_seconds: u32,
    /// Let the demo pilot play
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            starting_lives: STARTING_LIVES,
            max_player_shots: MAX_PLAYER_SHOTS,
            alien_fire_interval_ms: ALIEN_FIRE_INTERVAL_MS,
            run_seconds: 120,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Parse from JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Read a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Clamp values the game cannot represent
    pub fn sanitized(mut self) -> Self {
        let lives = self.starting_lives.clamp(1, STARTING_LIVES);
        if lives != self.starting_lives {
            log::warn!("starting_lives {} out of range, using {}", self.starting_lives, lives);
            self.starting_lives = lives;
        }
        self.max_player_shots = self.max_player_shots.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.alien_fire_interval_ms, 700);
    }

    #[test]
    fn test_lives_are_clamped() {
        let settings = Settings::from_json(r#"{ "starting_lives": 9 }"#).unwrap();
        assert_eq!(settings.starting_lives, 3);
        let settings = Settings::from_json(r#"{ "starting_lives": 0 }"#).unwrap();
        assert_eq!(settings.starting_lives, 1);
    }

    #[test]
    fn test_sanitized_clamps_direct_construction() {
        let settings = Settings {
            starting_lives: 7,
            max_player_shots: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.max_player_shots, 1);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/space-invaders-settings.json");
        assert!(matches!(Settings::load(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("space-invaders-settings-{}.json", std::process::id()));
        let settings = Settings {
            seed: 7,
            run_seconds: 5,
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);
    }
}
