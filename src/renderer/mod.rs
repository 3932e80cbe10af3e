//! Scoreboard rendering
//!
//! The controller hands a `FrameView` snapshot to a `Display` once per frame.
//! `layout` turns the snapshot into styled text lines; `terminal` draws them.

pub mod layout;
pub mod terminal;

use std::time::Duration;

use crate::error::Result;
use crate::hardware::{SolenoidId, SwitchId};
use crate::platform::SystemStatus;
use crate::sim::{GameMode, TestState};

pub use layout::{Line, Tone, compose};
pub use terminal::TerminalDisplay;

/// Everything a display needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameView {
    pub mode: GameMode,
    pub score: u64,
    pub high_score: u64,
    pub balls_left: u32,
    /// PIONEER letters lit
    pub collected: u32,
    pub jackpot_banner: bool,
    pub debug_overlay: bool,
    /// Attract-mode "PRESS ENTER" visibility
    pub blink_on: bool,
    pub hardware_real: bool,
    pub drop_targets: Vec<bool>,
    pub test: TestState,
    pub switches: Vec<(SwitchId, bool)>,
    /// Solenoids and whether each is mid-pulse
    pub solenoids: Vec<(SolenoidId, bool)>,
    pub music_volume: f32,
    pub system: SystemStatus,
    pub fps: u32,
}

impl FrameView {
    /// Empty attract-mode frame
    #[cfg(test)]
    pub(crate) fn idle(uptime: Duration) -> Self {
        Self {
            mode: GameMode::Attract,
            score: 0,
            high_score: 0,
            balls_left: 0,
            collected: 0,
            jackpot_banner: false,
            debug_overlay: false,
            blink_on: true,
            hardware_real: false,
            drop_targets: Vec::new(),
            test: TestState::default(),
            switches: Vec::new(),
            solenoids: Vec::new(),
            music_volume: 1.0,
            system: SystemStatus::with_uptime(uptime),
            fps: 0,
        }
    }
}

/// Render collaborator
pub trait Display {
    fn draw(&mut self, frame: &FrameView) -> Result<()>;
}

/// Display for headless runs (logs only)
#[derive(Debug, Default)]
pub struct NullDisplay {
    last_mode: Option<GameMode>,
}

impl Display for NullDisplay {
    fn draw(&mut self, frame: &FrameView) -> Result<()> {
        if self.last_mode != Some(frame.mode) {
            log::debug!("Display (headless) now showing {}", frame.mode);
            self.last_mode = Some(frame.mode);
        }
        Ok(())
    }
}
