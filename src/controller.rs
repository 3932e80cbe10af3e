//! The controller: single owner of everything the main loop touches
//!
//! One `frame` call polls switches, steps the state machine, fires pulses and
//! turns the frame's events into sounds. Rendering reads a `FrameView`.

use std::io;
use std::time::{Duration, Instant};

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::ATTRACT_BLINK;
use crate::error::Result;
use crate::hardware::{Hardware, SwitchBank, SwitchId};
use crate::highscores::HighScore;
use crate::platform::{QuitFlag, SystemStatus};
use crate::renderer::{Display, FrameView};
use crate::settings::Settings;
use crate::sim::{
    Command, GameEvent, GameMode, GameState, PulseScheduler, Rules, TestScreen, TickInput,
    Trigger, tick,
};

/// How often the system status screen re-reads the host
const STATUS_REFRESH: Duration = Duration::from_secs(1);

pub struct Controller {
    state: GameState,
    pulses: PulseScheduler,
    switches: SwitchBank,
    audio: AudioManager,
    hardware_real: bool,
    started: Instant,
    quit: QuitFlag,
    fps: FpsCounter,
    system: SystemStatus,
    system_sampled: Option<Instant>,
}

impl Controller {
    /// Build the controller. Enters test mode straight away if asked to, or
    /// if the service button is held at boot.
    pub fn new(
        settings: &Settings,
        hardware: Hardware,
        mut audio: AudioManager,
        boot_test: bool,
        now: Instant,
    ) -> Result<Self> {
        let hardware_real = hardware.is_real();
        let Hardware {
            switches,
            solenoids,
            ..
        } = hardware;

        let high_score = HighScore::load(&settings.high_score_file);
        log::info!("High score loaded: {}", high_score.value());

        let mut state = GameState::new(Rules::from(settings), high_score);
        let pulses = PulseScheduler::new(solenoids, settings.test_refire())?;

        // Levels at boot are the baseline: a held switch is not a new event
        let boot = switches.poll();
        for id in switches.ids() {
            state.edges.rising(id, boot.is_pressed(id));
        }
        state.switches = boot.clone();

        if boot_test || boot.is_pressed(SwitchId::Service) {
            log::info!("Entering test mode at boot");
            state.apply_trigger(Trigger::EnterTest);
        }

        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        if settings.music_on_start {
            audio.start_music();
        }

        Ok(Self {
            state,
            pulses,
            switches,
            audio,
            hardware_real,
            started: now,
            quit: QuitFlag::new(),
            fps: FpsCounter::new(now),
            system: SystemStatus::with_uptime(Duration::ZERO),
            system_sampled: None,
        })
    }

    /// Run one frame with the operator commands received since the last one
    pub fn frame(&mut self, commands: Vec<Command>, now: Instant) {
        if commands.contains(&Command::Quit) {
            log::info!("Quit requested");
            self.quit.request();
        }

        let input = TickInput {
            commands,
            switches: self.switches.poll(),
        };
        tick(&mut self.state, &mut self.pulses, &input, now);

        let events = self.state.drain_events();
        self.handle_events(&events);

        self.fps.frame(now);
        self.refresh_system(now);
    }

    fn handle_events(&mut self, events: &[GameEvent]) {
        let mut played: Vec<SoundEffect> = Vec::new();
        for event in events {
            let effect = match *event {
                GameEvent::TargetHit => Some(SoundEffect::Hit),
                GameEvent::BumperHit(_) => Some(SoundEffect::Bumper),
                GameEvent::GoalScored { .. } | GameEvent::Jackpot => Some(SoundEffect::Jackpot),
                GameEvent::TestSound(effect) => Some(effect),
                GameEvent::TestVolume(volume) => {
                    self.audio.set_music_volume(volume);
                    None
                }
                GameEvent::MusicToggled => {
                    self.audio.toggle_music();
                    None
                }
                GameEvent::NewHighScore(best) => {
                    log::debug!("New high score {best}");
                    None
                }
                _ => None,
            };
            // one of each per frame; a goal completing the token is one jackpot sound
            if let Some(effect) = effect {
                if !played.contains(&effect) {
                    self.audio.play(effect);
                    played.push(effect);
                }
            }
        }
    }

    fn refresh_system(&mut self, now: Instant) {
        if self.state.mode != GameMode::Test || self.state.test.screen != TestScreen::System {
            return;
        }
        let stale = self
            .system_sampled
            .is_none_or(|at| now.saturating_duration_since(at) >= STATUS_REFRESH);
        if stale {
            self.system = SystemStatus::sample(self.uptime(now));
            self.system_sampled = Some(now);
        }
    }

    pub fn uptime(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Snapshot for the display
    pub fn frame_view(&self, now: Instant) -> FrameView {
        let state = &self.state;
        let blink_ticks = self.uptime(now).as_millis() / ATTRACT_BLINK.as_millis().max(1);
        let mut system = self.system.clone();
        system.uptime = self.uptime(now);

        FrameView {
            mode: state.mode,
            score: state.score.score,
            high_score: state.high_score(),
            balls_left: state.score.balls_left,
            collected: state.score.collected,
            jackpot_banner: state.score.jackpot_banner(now),
            debug_overlay: state.debug_overlay,
            blink_on: blink_ticks % 2 == 0,
            hardware_real: self.hardware_real,
            drop_targets: state.bank.flags().to_vec(),
            test: state.test.clone(),
            switches: self
                .switches
                .ids()
                .map(|id| (id, state.switches.is_pressed(id)))
                .collect(),
            solenoids: self
                .pulses
                .ids()
                .map(|id| (id, self.pulses.is_energized(id)))
                .collect(),
            music_volume: self.audio.music_volume(),
            system,
            fps: self.fps.current,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.is_requested()
    }

    /// Handle that stops the frame loop from outside (signal handlers)
    pub fn quit_flag(&self) -> QuitFlag {
        self.quit.clone()
    }

    /// Frame loop: read operator keys, step, draw, pace. Runs until a quit is
    /// requested. A failing key source is dropped and the loop keeps going.
    pub fn run(
        &mut self,
        display: &mut dyn Display,
        keys: &mut dyn FnMut() -> io::Result<Vec<Command>>,
        frame_time: Duration,
    ) -> Result<()> {
        let mut keyboard = true;
        while !self.quit_requested() {
            let frame_start = Instant::now();

            let commands = if keyboard {
                keys().unwrap_or_else(|e| {
                    log::warn!("Keyboard unavailable ({e}); operator keys disabled");
                    keyboard = false;
                    Vec::new()
                })
            } else {
                Vec::new()
            };

            let now = Instant::now();
            self.frame(commands, now);
            display.draw(&self.frame_view(now))?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                std::thread::sleep(frame_time - elapsed);
            }
        }
        Ok(())
    }

    /// Wait for in-flight pulses, then release every pin
    pub fn shutdown(&mut self) {
        self.pulses.shutdown();
        self.switches.close();
        log::info!("Controller stopped, high score {}", self.state.high_score());
    }
}

/// Frames counted over the last whole second
#[derive(Debug)]
struct FpsCounter {
    window_start: Instant,
    frames: u32,
    current: u32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            current: 0,
        }
    }

    fn frame(&mut self, now: Instant) {
        self.frames += 1;
        if now.saturating_duration_since(self.window_start) >= Duration::from_secs(1) {
            self.current = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
    }
}
