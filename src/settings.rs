//! Cabinet settings
//!
//! Read once at startup from an optional JSON file. Every field has a default,
//! so a partial file only overrides what it names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{Error, Result};

/// BCM pin numbers of every switch and solenoid on the playfield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    /// Strike plate (standup target)
    pub strike_plate: u8,
    pub bumper1: u8,
    pub bumper2: u8,
    /// One pin per drop target; the bank size follows this list
    pub drop_targets: Vec<u8>,
    /// Goal sensor behind the drop targets
    pub goal: u8,
    pub drain: u8,
    /// Service button for entering test mode
    pub service: u8,
    pub gate1: u8,
    pub gate2: u8,
    /// Drop-target bank reset solenoid
    pub bank_reset: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            strike_plate: 17,
            bumper1: 22,
            bumper2: 23,
            drop_targets: vec![12, 13, 16],
            goal: 20,
            drain: 24,
            service: 21,
            gate1: 5,
            gate2: 6,
            bank_reset: 26,
        }
    }
}

/// Controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Game ===
    /// Balls per game
    pub balls_per_game: u32,
    pub target_award: u64,
    pub bumper_award: u64,
    pub goal_award: u64,
    pub jackpot_bonus: u64,

    // === Timing (milliseconds) ===
    pub target_cooldown_ms: u64,
    pub bumper_cooldown_ms: u64,
    pub goal_poll_guard_ms: u64,
    pub bumper_pulse_ms: u64,
    pub bank_reset_pulse_ms: u64,
    pub bank_settle_ms: u64,
    pub test_pulse_ms: u64,
    pub test_refire_ms: u64,

    // === Display ===
    pub fps: u32,

    // === Persistence ===
    /// Plain-text file holding the all-time high score
    pub high_score_file: PathBuf,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Start the ambient music loop at boot
    pub music_on_start: bool,
    /// Silence sound effects (music still follows `music_on_start`)
    pub muted: bool,

    // === Hardware ===
    pub pins: PinMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            balls_per_game: consts::BALLS_PER_GAME,
            target_award: consts::TARGET_AWARD,
            bumper_award: consts::BUMPER_AWARD,
            goal_award: consts::GOAL_AWARD,
            jackpot_bonus: consts::JACKPOT_BONUS,

            target_cooldown_ms: consts::TARGET_COOLDOWN.as_millis() as u64,
            bumper_cooldown_ms: consts::BUMPER_COOLDOWN.as_millis() as u64,
            goal_poll_guard_ms: consts::GOAL_POLL_GUARD.as_millis() as u64,
            bumper_pulse_ms: consts::BUMPER_PULSE.as_millis() as u64,
            bank_reset_pulse_ms: consts::BANK_RESET_PULSE.as_millis() as u64,
            bank_settle_ms: consts::BANK_SETTLE.as_millis() as u64,
            test_pulse_ms: consts::TEST_PULSE.as_millis() as u64,
            test_refire_ms: consts::TEST_REFIRE_INTERVAL.as_millis() as u64,

            fps: consts::TARGET_FPS,

            high_score_file: PathBuf::from("pinball_highscore.txt"),

            master_volume: 0.8,
            sfx_volume: 0.7,
            music_volume: 0.6,
            music_on_start: true,
            muted: false,

            pins: PinMap::default(),
        }
    }
}

impl Settings {
    pub fn target_cooldown(&self) -> Duration {
        Duration::from_millis(self.target_cooldown_ms)
    }

    pub fn bumper_cooldown(&self) -> Duration {
        Duration::from_millis(self.bumper_cooldown_ms)
    }

    pub fn goal_poll_guard(&self) -> Duration {
        Duration::from_millis(self.goal_poll_guard_ms)
    }

    pub fn bumper_pulse(&self) -> Duration {
        Duration::from_millis(self.bumper_pulse_ms)
    }

    pub fn bank_reset_pulse(&self) -> Duration {
        Duration::from_millis(self.bank_reset_pulse_ms)
    }

    pub fn bank_settle(&self) -> Duration {
        Duration::from_millis(self.bank_settle_ms)
    }

    pub fn test_pulse(&self) -> Duration {
        Duration::from_millis(self.test_pulse_ms)
    }

    pub fn test_refire(&self) -> Duration {
        Duration::from_millis(self.test_refire_ms)
    }

    /// Number of targets in the drop-target bank
    pub fn drop_target_count(&self) -> usize {
        self.pins.drop_targets.len()
    }

    /// Duration of one frame at the configured rate
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Clamp values that would break the controller back into range
    pub fn sanitize(&mut self) {
        if self.pins.drop_targets.is_empty() {
            log::warn!("Settings list no drop targets, using default bank");
            self.pins.drop_targets = PinMap::default().drop_targets;
        }
        if self.fps == 0 {
            log::warn!("Settings fps is 0, using {}", consts::TARGET_FPS);
            self.fps = consts::TARGET_FPS;
        }
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut settings: Settings =
            serde_json::from_str(&json).map_err(|source| Error::Settings {
                path: path.to_path_buf(),
                source,
            })?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cabinet() {
        let settings = Settings::default();
        assert_eq!(settings.drop_target_count(), 3);
        assert_eq!(settings.target_cooldown(), Duration::from_millis(400));
        assert_eq!(settings.bumper_cooldown(), Duration::from_millis(300));
        assert_eq!(settings.balls_per_game, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "balls_per_game": 5, "pins": { "goal": 4 } }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.balls_per_game, 5);
        assert_eq!(settings.pins.goal, 4);
        assert_eq!(settings.pins.drain, 24);
        assert_eq!(settings.target_award, 500);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::read(&path), Err(Error::Settings { .. })));
        let settings = Settings::load(&path);
        assert_eq!(settings.balls_per_game, 2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json"));
        assert_eq!(settings.fps, 60);
    }

    #[test]
    fn test_sanitize_restores_bank_and_clamps_volume() {
        let mut settings = Settings::default();
        settings.pins.drop_targets.clear();
        settings.fps = 0;
        settings.music_volume = 3.0;
        settings.sanitize();
        assert_eq!(settings.drop_target_count(), 3);
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.music_volume, 1.0);
    }

    #[test]
    fn test_save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.jackpot_bonus = 25_000;
        settings.save(&path).unwrap();
        assert_eq!(Settings::read(&path).unwrap().jackpot_bonus, 25_000);
    }
}
