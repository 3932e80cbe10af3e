//! Per-frame update
//!
//! Order within a frame: operator commands, switch polling, game-over check.
//! Mode changes happen only here, between frames, never mid-draw.

use std::time::Instant;

use super::mode::{TestAction, TestInput, Trigger, transition};
use super::pulse::PulseSink;
use super::state::{GameEvent, GameMode, GameState};
use crate::hardware::{SwitchId, SwitchSnapshot};

/// Operator console commands (keyboard), interpreted per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter: start / acknowledge / target hit / select
    Confirm,
    /// Space: bumper 2 in play, select in diagnostics
    Action,
    TargetHit,
    BumperHit(u8),
    Goal,
    AdvanceProgress,
    DropTarget(usize),
    Drain,
    ResetRound,
    ToggleDebug,
    ToggleMusic,
    EnterTest,
    /// Esc: leave diagnostics
    Back,
    Left,
    Right,
    Up,
    Down,
    VolumeUp,
    VolumeDown,
    Quit,
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Operator commands received since the last frame
    pub commands: Vec<Command>,
    /// Switch levels polled this frame
    pub switches: SwitchSnapshot,
}

/// Advance the controller by one frame
pub fn tick(state: &mut GameState, pulses: &mut dyn PulseSink, input: &TickInput, now: Instant) {
    for &command in &input.commands {
        apply_command(state, pulses, command, now);
    }

    poll_switches(state, pulses, &input.switches, now);

    if state.mode == GameMode::Gameplay && state.score.is_exhausted() {
        log::info!("GAME OVER, final score {}", state.score.score);
        state.apply_trigger(Trigger::BallsExhausted);
    }

    state.switches = input.switches.clone();
}

impl GameState {
    /// Run one transition through the mode table. Returns true if the mode changed.
    pub fn apply_trigger(&mut self, trigger: Trigger) -> bool {
        let from = self.mode;
        let Some(to) = transition(from, trigger) else {
            return false;
        };
        match (from, to) {
            (GameMode::Attract, GameMode::Gameplay) => self.reset_round(),
            (GameMode::GameOver, GameMode::Attract) => self.reset_round(),
            (_, GameMode::Test) => self.test = Default::default(),
            _ => {}
        }
        self.mode = to;
        log::info!("Mode {from} -> {to}");
        self.emit(GameEvent::ModeChanged { from, to });
        true
    }

    /// Game over acknowledged: back through attract into a fresh round
    pub fn acknowledge_game_over(&mut self) {
        if self.apply_trigger(Trigger::Acknowledge) {
            self.apply_trigger(Trigger::Start);
        }
    }
}

fn apply_command(state: &mut GameState, pulses: &mut dyn PulseSink, command: Command, now: Instant) {
    if command == Command::ToggleMusic {
        state.emit(GameEvent::MusicToggled);
        return;
    }

    match state.mode {
        GameMode::Attract => match command {
            Command::Confirm => {
                state.apply_trigger(Trigger::Start);
            }
            Command::EnterTest => {
                state.apply_trigger(Trigger::EnterTest);
            }
            _ => {}
        },
        GameMode::Gameplay => match command {
            Command::Confirm | Command::TargetHit => {
                state.on_target_hit(now);
            }
            Command::Action => {
                state.on_bumper_hit(2, now, pulses);
            }
            Command::BumperHit(bumper) => {
                state.on_bumper_hit(bumper, now, pulses);
            }
            Command::Goal => state.on_goal_scored(now),
            Command::AdvanceProgress => state.on_advance_progress(now),
            Command::DropTarget(index) => {
                state.on_drop_target_hit(index, now, pulses);
            }
            Command::Drain => state.on_ball_drained(),
            Command::ResetRound => {
                log::info!("Round reset by operator");
                state.reset_round();
            }
            Command::ToggleDebug => state.debug_overlay = !state.debug_overlay,
            _ => {}
        },
        GameMode::GameOver => {
            if command == Command::Confirm {
                state.acknowledge_game_over();
            }
        }
        GameMode::Test => {
            let input = match command {
                Command::Back => {
                    state.apply_trigger(Trigger::ExitTest);
                    return;
                }
                Command::Left => TestInput::Left,
                Command::Right => TestInput::Right,
                Command::Up => TestInput::Up,
                Command::Down => TestInput::Down,
                Command::Confirm | Command::Action => TestInput::Select,
                Command::VolumeUp => TestInput::VolumeUp,
                Command::VolumeDown => TestInput::VolumeDown,
                _ => return,
            };
            if let Some(action) = state.test.handle(input) {
                run_test_action(state, pulses, action, now);
            }
        }
    }
}

fn run_test_action(state: &mut GameState, pulses: &mut dyn PulseSink, action: TestAction, now: Instant) {
    match action {
        TestAction::FireSolenoid(id) => {
            if pulses.fire_guarded(id, state.rules.test_pulse, now) {
                log::info!("[TEST] Firing solenoid: {id}");
            }
        }
        TestAction::PlaySound(effect) => {
            log::info!("[TEST] Playing sound: {effect} (vol={:.2})", state.test.volume);
            state.emit(GameEvent::TestSound(effect));
        }
        TestAction::SetVolume(volume) => state.emit(GameEvent::TestVolume(volume)),
    }
}

/// Feed one frame of switch levels through the conditioning policies.
///
/// Edge state is tracked in every mode so that a switch already held when
/// play starts (a ball resting in the trough) does not count as a new event.
/// Drop targets are the exception: a target stays down until the reset coil
/// lifts it, so its level is latched into the bank flags instead. A target
/// still down after a round reset or a settle window is counted again.
fn poll_switches(state: &mut GameState, pulses: &mut dyn PulseSink, switches: &SwitchSnapshot, now: Instant) {
    let drain_edge = state.edges.rising(SwitchId::Drain, switches.is_pressed(SwitchId::Drain));
    let service_edge = state
        .edges
        .rising(SwitchId::Service, switches.is_pressed(SwitchId::Service));

    match state.mode {
        GameMode::Attract => {
            if service_edge {
                state.apply_trigger(Trigger::EnterTest);
            }
        }
        GameMode::Test => {
            if service_edge {
                state.apply_trigger(Trigger::ExitTest);
            }
        }
        GameMode::GameOver => {}
        GameMode::Gameplay => {
            if switches.is_pressed(SwitchId::StrikePlate) {
                state.on_target_hit(now);
            }
            for bumper in [1, 2] {
                if switches.is_pressed(SwitchId::Bumper(bumper)) {
                    state.on_bumper_hit(bumper, now, pulses);
                }
            }
            for index in 0..state.bank.len() {
                if switches.is_pressed(SwitchId::DropTarget(index)) && !state.bank.is_down(index) {
                    state.on_drop_target_hit(index, now, pulses);
                }
            }
            if switches.is_pressed(SwitchId::Goal) && state.cooldowns.accept(SwitchId::Goal, now) {
                state.on_goal_scored(now);
            }
            if drain_edge {
                state.on_ball_drained();
            }
        }
    }
}
