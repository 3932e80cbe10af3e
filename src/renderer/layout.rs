//! Screen composition
//!
//! Pure function from a `FrameView` to centered, styled text lines. Kept apart
//! from the terminal backend so every screen can be checked in tests.

use super::FrameView;
use crate::audio::SoundEffect;
use crate::consts::{PROGRESS_TOKEN, TARGET_FPS};
use crate::hardware::SolenoidId;
use crate::sim::{GameMode, TestScreen};

/// Placeholder for an unlit progress letter
const UNLIT: char = '•';

const TEST_FOOTER: &str = "LEFT/RIGHT = Change Screen   ESC = Exit Test Mode";

/// Visual style of a line; the backend picks the colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Header,
    Highlight,
    /// Switch pressed / coil energized
    Active,
    Inactive,
    Alert,
    Dim,
    /// Display test colour pattern
    Pattern(usize),
}

/// One row of the scoreboard
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new("", Tone::Normal)
    }
}

/// Lines for the current frame, top to bottom
pub fn compose(frame: &FrameView) -> Vec<Line> {
    let mut lines = match frame.mode {
        GameMode::Attract => attract(frame),
        GameMode::Gameplay => gameplay(frame),
        GameMode::GameOver => game_over(frame),
        GameMode::Test => test(frame),
    };

    if frame.debug_overlay && frame.mode != GameMode::Test {
        lines.push(Line::blank());
        lines.push(Line::new(debug_line(frame), Tone::Dim));
    }
    lines
}

/// "PIONEER" with uncollected letters blanked
pub fn progress_letters(collected: u32) -> String {
    PROGRESS_TOKEN
        .chars()
        .enumerate()
        .map(|(i, c)| if (i as u32) < collected { c } else { UNLIT })
        .flat_map(|c| [c, ' '])
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn attract(frame: &FrameView) -> Vec<Line> {
    let mut lines = vec![
        Line::new("SHU PIONEER PINBALL", Tone::Header),
        Line::blank(),
        Line::new(format!("ALL-TIME HIGH SCORE: {}", frame.high_score), Tone::Highlight),
        Line::blank(),
    ];
    if frame.blink_on {
        lines.push(Line::new("PRESS ENTER TO START", Tone::Normal));
    } else {
        lines.push(Line::blank());
    }
    lines
}

fn gameplay(frame: &FrameView) -> Vec<Line> {
    let mut lines = vec![
        Line::new(format!("{}", frame.score), Tone::Header),
        Line::new(format!("HIGH SCORE: {}", frame.high_score), Tone::Dim),
        Line::blank(),
        Line::new(progress_letters(frame.collected), Tone::Highlight),
        Line::blank(),
        Line::new(format!("Balls: {}", frame.balls_left), Tone::Normal),
    ];
    if frame.jackpot_banner {
        lines.push(Line::blank());
        lines.push(Line::new("MEGA JACKPOT!!", Tone::Alert));
    }
    lines
}

fn game_over(frame: &FrameView) -> Vec<Line> {
    vec![
        Line::new("GAME OVER", Tone::Alert),
        Line::blank(),
        Line::new(format!("FINAL SCORE: {}", frame.score), Tone::Header),
        Line::new(format!("ALL-TIME HIGH: {}", frame.high_score), Tone::Highlight),
        Line::blank(),
        Line::new("PRESS ENTER TO RESTART", Tone::Normal),
    ]
}

fn test(frame: &FrameView) -> Vec<Line> {
    let screen = frame.test.screen;
    let mut lines = vec![
        Line::new(format!("TEST MODE - {}", screen.title()), Tone::Header),
        Line::new(
            if frame.hardware_real {
                "Hardware: GPIO"
            } else {
                "Hardware: MOCK"
            },
            Tone::Dim,
        ),
        Line::blank(),
    ];

    match screen {
        TestScreen::Switches => {
            lines.push(Line::new("Press switches to verify inputs", Tone::Dim));
            for (id, pressed) in &frame.switches {
                let (state, tone) = if *pressed {
                    ("PRESSED", Tone::Active)
                } else {
                    ("open", Tone::Inactive)
                };
                lines.push(Line::new(format!("{:<16} {state:>8}", id.to_string()), tone));
            }
        }
        TestScreen::Solenoids => {
            lines.push(Line::new("UP/DOWN = Select   SPACE = Fire", Tone::Dim));
            let selected = frame.test.selected_solenoid();
            for (id, energized) in &frame.solenoids {
                lines.push(solenoid_line(*id, *energized, *id == selected));
            }
        }
        TestScreen::Display => {
            lines.push(Line::new("SPACE = Next Pattern", Tone::Dim));
            let pattern = frame.test.display_pattern;
            lines.push(Line::new(format!("Pattern {}", pattern + 1), Tone::Normal));
            for _ in 0..3 {
                lines.push(Line::new("█".repeat(40), Tone::Pattern(pattern)));
            }
        }
        TestScreen::Audio => {
            lines.push(Line::new(
                "UP/DOWN = Select   SPACE = Play   +/- = Volume",
                Tone::Dim,
            ));
            let selected = frame.test.selected_sound();
            for effect in SoundEffect::ALL {
                let marker = if effect == selected { ">" } else { " " };
                let tone = if effect == selected {
                    Tone::Highlight
                } else {
                    Tone::Normal
                };
                lines.push(Line::new(format!("{marker} {effect}"), tone));
            }
            lines.push(Line::blank());
            lines.push(Line::new(
                format!("Music volume: {:.0}%", frame.music_volume * 100.0),
                Tone::Normal,
            ));
        }
        TestScreen::System => {
            lines.push(Line::new(frame.system.uptime_text(), Tone::Normal));
            lines.push(Line::new(frame.system.temp_text(), Tone::Normal));
            lines.push(Line::new(frame.system.load_text(), Tone::Normal));
            lines.push(Line::new(format!("FPS: {}/{}", frame.fps, TARGET_FPS), Tone::Dim));
        }
    }

    lines.push(Line::blank());
    lines.push(Line::new(TEST_FOOTER, Tone::Dim));
    lines
}

fn solenoid_line(id: SolenoidId, energized: bool, selected: bool) -> Line {
    let marker = if selected { ">" } else { " " };
    let state = if energized { "ON" } else { "off" };
    let tone = match (energized, selected) {
        (true, _) => Tone::Active,
        (false, true) => Tone::Highlight,
        (false, false) => Tone::Normal,
    };
    Line::new(format!("{marker} {:<20} {state:>4}", id.to_string()), tone)
}

fn debug_line(frame: &FrameView) -> String {
    let targets: String = frame
        .drop_targets
        .iter()
        .map(|down| if *down { 'X' } else { '_' })
        .collect();
    format!(
        "[debug] mode={} letters={} bank=[{}] fps={}",
        frame.mode, frame.collected, targets, frame.fps
    )
}
