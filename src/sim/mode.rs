//! Game mode state machine and the diagnostic screen navigator
//!
//! Both are plain tables driven once per frame by `tick`; no screen ever runs
//! its own loop.

use super::state::GameMode;
use crate::audio::SoundEffect;
use crate::consts::TEST_VOLUME_STEP;
use crate::hardware::SolenoidId;

/// Inputs that can move the cabinet between modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Player pressed start
    Start,
    /// Service button / hidden key combination
    EnterTest,
    /// Operator left diagnostics
    ExitTest,
    /// Last ball drained
    BallsExhausted,
    /// Game over screen acknowledged
    Acknowledge,
}

/// Transition table. `None` means the trigger is ignored in that mode.
pub fn transition(mode: GameMode, trigger: Trigger) -> Option<GameMode> {
    use GameMode::*;
    use Trigger::*;
    match (mode, trigger) {
        (Attract, Start) => Some(Gameplay),
        (Attract, EnterTest) => Some(Test),
        (Test, ExitTest) => Some(Attract),
        (Gameplay, BallsExhausted) => Some(GameOver),
        (GameOver, Acknowledge) => Some(Attract),
        _ => None,
    }
}

/// Diagnostic sub-screens, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestScreen {
    #[default]
    Switches,
    Solenoids,
    Display,
    Audio,
    System,
}

impl TestScreen {
    pub const ALL: [TestScreen; 5] = [
        TestScreen::Switches,
        TestScreen::Solenoids,
        TestScreen::Display,
        TestScreen::Audio,
        TestScreen::System,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TestScreen::Switches => "SWITCH TEST",
            TestScreen::Solenoids => "SOLENOID TEST",
            TestScreen::Display => "DISPLAY TEST",
            TestScreen::Audio => "AUDIO TEST",
            TestScreen::System => "SYSTEM STATUS",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Number of colour patterns on the display test screen
pub const DISPLAY_PATTERNS: usize = 4;

/// Navigation input inside test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestInput {
    Left,
    Right,
    Up,
    Down,
    /// Space / Enter
    Select,
    VolumeUp,
    VolumeDown,
}

/// What a test-mode input asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestAction {
    FireSolenoid(SolenoidId),
    PlaySound(SoundEffect),
    SetVolume(f32),
}

/// Diagnostic screen state
#[derive(Debug, Clone, PartialEq)]
pub struct TestState {
    pub screen: TestScreen,
    pub solenoid_index: usize,
    pub sound_index: usize,
    pub display_pattern: usize,
    pub volume: f32,
}

impl Default for TestState {
    fn default() -> Self {
        Self {
            screen: TestScreen::default(),
            solenoid_index: 0,
            sound_index: 0,
            display_pattern: 0,
            volume: 1.0,
        }
    }
}

impl TestState {
    pub fn selected_solenoid(&self) -> SolenoidId {
        SolenoidId::ALL[self.solenoid_index % SolenoidId::ALL.len()]
    }

    pub fn selected_sound(&self) -> SoundEffect {
        SoundEffect::ALL[self.sound_index % SoundEffect::ALL.len()]
    }

    /// Apply one input. Left/Right always change screen; the rest depend on it.
    pub fn handle(&mut self, input: TestInput) -> Option<TestAction> {
        match input {
            TestInput::Left => {
                self.screen = self.screen.prev();
                return None;
            }
            TestInput::Right => {
                self.screen = self.screen.next();
                return None;
            }
            _ => {}
        }

        match self.screen {
            TestScreen::Solenoids => {
                let n = SolenoidId::ALL.len();
                match input {
                    TestInput::Up => self.solenoid_index = (self.solenoid_index + n - 1) % n,
                    TestInput::Down => self.solenoid_index = (self.solenoid_index + 1) % n,
                    TestInput::Select => {
                        return Some(TestAction::FireSolenoid(self.selected_solenoid()));
                    }
                    _ => {}
                }
            }
            TestScreen::Audio => {
                let n = SoundEffect::ALL.len();
                match input {
                    TestInput::Up => self.sound_index = (self.sound_index + n - 1) % n,
                    TestInput::Down => self.sound_index = (self.sound_index + 1) % n,
                    TestInput::VolumeUp => {
                        self.volume = (self.volume + TEST_VOLUME_STEP).min(1.0);
                        return Some(TestAction::SetVolume(self.volume));
                    }
                    TestInput::VolumeDown => {
                        self.volume = (self.volume - TEST_VOLUME_STEP).max(0.0);
                        return Some(TestAction::SetVolume(self.volume));
                    }
                    TestInput::Select => {
                        return Some(TestAction::PlaySound(self.selected_sound()));
                    }
                    _ => {}
                }
            }
            TestScreen::Display => {
                if input == TestInput::Select {
                    self.display_pattern = (self.display_pattern + 1) % DISPLAY_PATTERNS;
                }
            }
            TestScreen::Switches | TestScreen::System => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [GameMode; 4] = [
        GameMode::Attract,
        GameMode::Gameplay,
        GameMode::Test,
        GameMode::GameOver,
    ];
    const TRIGGERS: [Trigger; 5] = [
        Trigger::Start,
        Trigger::EnterTest,
        Trigger::ExitTest,
        Trigger::BallsExhausted,
        Trigger::Acknowledge,
    ];

    #[test]
    fn test_every_mode_has_an_exit() {
        for mode in MODES {
            let exits = TRIGGERS
                .iter()
                .filter_map(|t| transition(mode, *t))
                .filter(|to| *to != mode)
                .count();
            assert!(exits > 0, "{mode} has no exit");
        }
    }

    #[test]
    fn test_table() {
        assert_eq!(transition(GameMode::Attract, Trigger::Start), Some(GameMode::Gameplay));
        assert_eq!(transition(GameMode::Attract, Trigger::EnterTest), Some(GameMode::Test));
        assert_eq!(transition(GameMode::Test, Trigger::ExitTest), Some(GameMode::Attract));
        assert_eq!(
            transition(GameMode::Gameplay, Trigger::BallsExhausted),
            Some(GameMode::GameOver)
        );
        assert_eq!(transition(GameMode::GameOver, Trigger::Acknowledge), Some(GameMode::Attract));

        // gameplay cannot jump straight into diagnostics
        assert_eq!(transition(GameMode::Gameplay, Trigger::EnterTest), None);
        assert_eq!(transition(GameMode::Test, Trigger::Start), None);
    }

    #[test]
    fn test_screen_navigation_wraps() {
        let mut test = TestState::default();
        test.handle(TestInput::Left);
        assert_eq!(test.screen, TestScreen::System);
        test.handle(TestInput::Right);
        test.handle(TestInput::Right);
        assert_eq!(test.screen, TestScreen::Solenoids);
    }

    #[test]
    fn test_solenoid_selection_and_fire() {
        let mut test = TestState {
            screen: TestScreen::Solenoids,
            ..Default::default()
        };
        test.handle(TestInput::Up);
        assert_eq!(test.selected_solenoid(), SolenoidId::BankReset);
        test.handle(TestInput::Down);
        assert_eq!(
            test.handle(TestInput::Select),
            Some(TestAction::FireSolenoid(SolenoidId::Gate(1)))
        );
    }

    #[test]
    fn test_audio_volume_clamps() {
        let mut test = TestState {
            screen: TestScreen::Audio,
            ..Default::default()
        };
        assert_eq!(test.handle(TestInput::VolumeUp), Some(TestAction::SetVolume(1.0)));
        for _ in 0..15 {
            test.handle(TestInput::VolumeDown);
        }
        assert_eq!(test.volume, 0.0);
        test.handle(TestInput::Down);
        assert_eq!(
            test.handle(TestInput::Select),
            Some(TestAction::PlaySound(SoundEffect::Bumper))
        );
    }

    #[test]
    fn test_display_pattern_cycles() {
        let mut test = TestState {
            screen: TestScreen::Display,
            ..Default::default()
        };
        for _ in 0..5 {
            test.handle(TestInput::Select);
        }
        assert_eq!(test.display_pattern, 1);
    }
}
