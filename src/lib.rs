//! PIONEER Pinball - scoreboard controller for a physical pinball cabinet
//!
//! Core modules:
//! - `sim`: Switch debouncing, event dispatch, solenoid pulses, game modes
//! - `hardware`: Switch/solenoid capability traits (GPIO or mock)
//! - `controller`: The single owner of game state, threaded through the main loop
//! - `renderer`: Scoreboard display collaborator
//! - `audio`: Sound effect / music collaborator
//! - `platform`: Operator keyboard bindings and system status

pub mod audio;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::Controller;
pub use error::{Error, Result};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Target frame rate of the main loop
    pub const TARGET_FPS: u32 = 60;

    /// Letters collected by scoring goals
    pub const PROGRESS_TOKEN: &str = "PIONEER";
    /// Number of letters needed for a jackpot
    pub const PROGRESS_LEN: u32 = PROGRESS_TOKEN.len() as u32;

    /// Balls per game
    pub const BALLS_PER_GAME: u32 = 2;

    /// Score awards
    pub const TARGET_AWARD: u64 = 500;
    pub const BUMPER_AWARD: u64 = 100;
    pub const GOAL_AWARD: u64 = 2000;
    pub const JACKPOT_BONUS: u64 = 10_000;

    /// Minimum re-trigger interval of the strike plate
    pub const TARGET_COOLDOWN: Duration = Duration::from_millis(400);
    /// Minimum re-trigger interval of each bumper
    pub const BUMPER_COOLDOWN: Duration = Duration::from_millis(300);
    /// Poll guard for a goal sensor held by a resting ball
    pub const GOAL_POLL_GUARD: Duration = Duration::from_millis(300);

    /// Bumper gate pulse length
    pub const BUMPER_PULSE: Duration = Duration::from_millis(100);
    /// Drop-target bank reset pulse length
    pub const BANK_RESET_PULSE: Duration = Duration::from_millis(250);
    /// Bank ignores new hits for this long after a reset
    pub const BANK_SETTLE: Duration = Duration::from_millis(200);
    /// Number of drop targets in the bank
    pub const DROP_TARGETS: usize = 3;

    /// Diagnostic solenoid pulse (short, safe)
    pub const TEST_PULSE: Duration = Duration::from_millis(80);
    /// Minimum delay between diagnostic fires of one solenoid
    pub const TEST_REFIRE_INTERVAL: Duration = Duration::from_millis(500);
    /// Diagnostic music volume step
    pub const TEST_VOLUME_STEP: f32 = 0.1;

    /// How long the jackpot banner stays on the scoreboard
    pub const JACKPOT_BANNER: Duration = Duration::from_secs(2);
    /// Attract screen "PRESS ENTER" blink period
    pub const ATTRACT_BLINK: Duration = Duration::from_millis(500);
}
