//! Game state and core scoreboard types
//!
//! Everything the main loop mutates lives in `GameState`; there are no globals.

use std::fmt;
use std::time::{Duration, Instant};

use super::debounce::{CooldownTracker, EdgeDetector};
use super::mode::TestState;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::hardware::{SwitchId, SwitchSnapshot};
use crate::highscores::HighScore;
use crate::settings::Settings;

/// Current mode of the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Idle splash, waiting for a player
    Attract,
    /// Active gameplay
    Gameplay,
    /// Service / diagnostics, isolated from scoring
    Test,
    /// Round ended, waiting for acknowledgement
    GameOver,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameMode::Attract => "ATTRACT",
            GameMode::Gameplay => "GAMEPLAY",
            GameMode::Test => "TEST",
            GameMode::GameOver => "GAME OVER",
        })
    }
}

/// Something that happened during a frame (consumed by audio/logging)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    TargetHit,
    BumperHit(u8),
    GoalScored { collected: u32 },
    ProgressAdvanced { collected: u32 },
    Jackpot,
    DropTargetDown(usize),
    BankReset,
    BallDrained { balls_left: u32 },
    NewHighScore(u64),
    RoundReset,
    ModeChanged { from: GameMode, to: GameMode },
    /// Diagnostic screen asked for a sound
    TestSound(SoundEffect),
    /// Diagnostic screen changed the music volume
    TestVolume(f32),
    MusicToggled,
}

/// Awards and timings of the table
#[derive(Debug, Clone)]
pub struct Rules {
    pub balls_per_game: u32,
    pub target_award: u64,
    pub bumper_award: u64,
    pub goal_award: u64,
    pub jackpot_bonus: u64,
    pub target_cooldown: Duration,
    pub bumper_cooldown: Duration,
    pub goal_poll_guard: Duration,
    pub bumper_pulse: Duration,
    pub bank_reset_pulse: Duration,
    pub bank_settle: Duration,
    pub test_pulse: Duration,
    pub drop_targets: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Rules {
    fn from(settings: &Settings) -> Self {
        Self {
            balls_per_game: settings.balls_per_game,
            target_award: settings.target_award,
            bumper_award: settings.bumper_award,
            goal_award: settings.goal_award,
            jackpot_bonus: settings.jackpot_bonus,
            target_cooldown: settings.target_cooldown(),
            bumper_cooldown: settings.bumper_cooldown(),
            goal_poll_guard: settings.goal_poll_guard(),
            bumper_pulse: settings.bumper_pulse(),
            bank_reset_pulse: settings.bank_reset_pulse(),
            bank_settle: settings.bank_settle(),
            test_pulse: settings.test_pulse(),
            drop_targets: settings.drop_target_count(),
        }
    }
}

/// Score, balls and letter progress of the current round
#[derive(Debug, Clone)]
pub struct ScoreState {
    pub score: u64,
    pub balls_left: u32,
    /// PIONEER letters collected (0..=PROGRESS_LEN)
    pub collected: u32,
    /// Set only for the instant a jackpot is detected
    pub jackpot: bool,
    /// When the last jackpot was awarded (drives the banner)
    pub last_jackpot: Option<Instant>,
    pub high_score: HighScore,
    balls_per_game: u32,
}

impl ScoreState {
    pub fn new(high_score: HighScore, balls_per_game: u32) -> Self {
        Self {
            score: 0,
            balls_left: balls_per_game,
            collected: 0,
            jackpot: false,
            last_jackpot: None,
            high_score,
            balls_per_game,
        }
    }

    /// Add points and sync the high score. Returns true on a new record.
    pub fn award(&mut self, points: u64) -> bool {
        self.score = self.score.saturating_add(points);
        self.high_score.submit(self.score)
    }

    /// Collect one letter (saturating). Returns true when the token is complete.
    pub fn advance_progress(&mut self) -> bool {
        if self.collected < PROGRESS_LEN {
            self.collected += 1;
        }
        self.collected == PROGRESS_LEN
    }

    /// Lose a ball (floored at zero); returns balls left
    pub fn drain_ball(&mut self) -> u32 {
        self.balls_left = self.balls_left.saturating_sub(1);
        self.balls_left
    }

    pub fn is_exhausted(&self) -> bool {
        self.balls_left == 0
    }

    /// Fresh round: score, letters and balls reset, high score kept
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.balls_left = self.balls_per_game;
        self.collected = 0;
        self.jackpot = false;
        self.last_jackpot = None;
    }

    /// True while the jackpot banner should be shown
    pub fn jackpot_banner(&self, now: Instant) -> bool {
        self.last_jackpot
            .is_some_and(|at| now.saturating_duration_since(at) < JACKPOT_BANNER)
    }
}

/// Outcome of marking a drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankHit {
    /// Target just went down
    Down,
    /// Target was already down
    AlreadyDown,
    /// Last target went down: bank reset, all flags cleared
    Completed,
    /// Bank is settling after a reset (or index out of range)
    Ignored,
}

/// Drop-target bank: K "down" flags reset together
#[derive(Debug, Clone)]
pub struct DropTargetBank {
    down: Vec<bool>,
    settle: Duration,
    settle_until: Option<Instant>,
}

impl DropTargetBank {
    pub fn new(targets: usize, settle: Duration) -> Self {
        Self {
            down: vec![false; targets],
            settle,
            settle_until: None,
        }
    }

    pub fn len(&self) -> usize {
        self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }

    pub fn is_down(&self, index: usize) -> bool {
        self.down.get(index).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &[bool] {
        &self.down
    }

    pub fn is_settling(&self, now: Instant) -> bool {
        self.settle_until.is_some_and(|until| now < until)
    }

    /// Mark one target down. When that completes the bank, every flag is
    /// cleared in the same call and the settle window opens.
    pub fn mark_down(&mut self, index: usize, now: Instant) -> BankHit {
        if self.is_settling(now) || index >= self.down.len() {
            return BankHit::Ignored;
        }
        if self.down[index] {
            return BankHit::AlreadyDown;
        }
        self.down[index] = true;
        if self.down.iter().all(|&d| d) {
            self.down.fill(false);
            self.settle_until = Some(now + self.settle);
            BankHit::Completed
        } else {
            BankHit::Down
        }
    }

    pub fn reset(&mut self) {
        self.down.fill(false);
        self.settle_until = None;
    }
}

/// Complete controller state, owned by one `Controller`
#[derive(Debug)]
pub struct GameState {
    pub mode: GameMode,
    pub score: ScoreState,
    pub bank: DropTargetBank,
    pub test: TestState,
    pub rules: Rules,
    /// Debug overlay on the scoreboard
    pub debug_overlay: bool,
    /// Switch levels seen on the last frame (for the switch test screen)
    pub switches: SwitchSnapshot,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) cooldowns: CooldownTracker<SwitchId>,
    pub(crate) edges: EdgeDetector<SwitchId>,
}

impl GameState {
    pub fn new(rules: Rules, high_score: HighScore) -> Self {
        let cooldowns = CooldownTracker::new()
            .with_cooldown(SwitchId::StrikePlate, rules.target_cooldown)
            .with_cooldown(SwitchId::Bumper(1), rules.bumper_cooldown)
            .with_cooldown(SwitchId::Bumper(2), rules.bumper_cooldown)
            .with_cooldown(SwitchId::Goal, rules.goal_poll_guard);
        Self {
            mode: GameMode::Attract,
            score: ScoreState::new(high_score, rules.balls_per_game),
            // settle counts from the end of the reset pulse
            bank: DropTargetBank::new(rules.drop_targets, rules.bank_reset_pulse + rules.bank_settle),
            test: TestState::default(),
            debug_overlay: false,
            switches: SwitchSnapshot::new(),
            events: Vec::new(),
            cooldowns,
            edges: EdgeDetector::new(),
            rules,
        }
    }

    pub fn high_score(&self) -> u64 {
        self.score.high_score.value()
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
