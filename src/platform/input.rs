//! Operator keyboard bindings
//!
//! Keys mirror the physical playfield events so the cabinet can be exercised
//! without hardware. The same key can mean different things per mode (Enter
//! starts, acknowledges, hits the strike plate or selects); `tick` decides.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Command;

/// Never let a burst of key repeats starve a frame
const MAX_EVENTS_PER_FRAME: usize = 64;

/// Map one key event to a command
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            // hidden service combination
            KeyCode::Char('t') => Some(Command::EnterTest),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Enter => Command::Confirm,
        KeyCode::Esc => Command::Back,
        KeyCode::Left => Command::Left,
        KeyCode::Right => Command::Right,
        KeyCode::Up => Command::Up,
        KeyCode::Down => Command::Down,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            ' ' => Command::Action,
            't' => Command::TargetHit,
            '1' => Command::BumperHit(1),
            '2' => Command::BumperHit(2),
            'o' => Command::Goal,
            'g' => Command::AdvanceProgress,
            'j' => Command::DropTarget(0),
            'k' => Command::DropTarget(1),
            'l' => Command::DropTarget(2),
            'b' => Command::Drain,
            'r' => Command::ResetRound,
            'd' => Command::ToggleDebug,
            'm' => Command::ToggleMusic,
            '+' | '=' => Command::VolumeUp,
            '-' => Command::VolumeDown,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

/// Collect every pending key command without blocking
pub fn poll_commands() -> io::Result<Vec<Command>> {
    let mut commands = Vec::new();
    for _ in 0..MAX_EVENTS_PER_FRAME {
        if !event::poll(Duration::ZERO)? {
            break;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(command) = command_for(&key) {
                commands.push(command);
            }
        }
    }
    Ok(commands)
}
