//! Full-screen terminal scoreboard (crossterm)

use std::io::{Stdout, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use super::layout::{Line, Tone, compose};
use super::{Display, FrameView};
use crate::error::Result;

const PATTERN_COLORS: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::White];

/// Owns the terminal for the lifetime of the scoreboard; restores it on drop
pub struct TerminalDisplay {
    out: Stdout,
    last: Vec<Line>,
    last_size: (u16, u16),
}

impl TerminalDisplay {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        Ok(Self {
            out,
            last: Vec::new(),
            last_size: (0, 0),
        })
    }

    fn paint(&mut self, lines: &[Line], (width, height): (u16, u16)) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;

        let top = height.saturating_sub(lines.len() as u16) / 2;
        for (row, line) in lines.iter().enumerate() {
            let y = top + row as u16;
            if y >= height {
                break;
            }
            let len = line.text.chars().count() as u16;
            let x = width.saturating_sub(len) / 2;
            queue!(self.out, MoveTo(x, y))?;
            if let Tone::Header | Tone::Alert = line.tone {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                self.out,
                SetForegroundColor(color(line.tone)),
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn color(tone: Tone) -> Color {
    match tone {
        Tone::Normal => Color::White,
        Tone::Header => Color::Cyan,
        Tone::Highlight => Color::Yellow,
        Tone::Active => Color::Green,
        Tone::Inactive => Color::DarkGrey,
        Tone::Alert => Color::Magenta,
        Tone::Dim => Color::Grey,
        Tone::Pattern(i) => PATTERN_COLORS[i % PATTERN_COLORS.len()],
    }
}

impl Display for TerminalDisplay {
    fn draw(&mut self, frame: &FrameView) -> Result<()> {
        let lines = compose(frame);
        let size = terminal::size()?;
        // only repaint on change to avoid flicker
        if lines == self.last && size == self.last_size {
            return Ok(());
        }
        self.paint(&lines, size)?;
        self.last = lines;
        self.last_size = size;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_colors_cycle() {
        assert_eq!(color(Tone::Pattern(0)), Color::Red);
        assert_eq!(color(Tone::Pattern(4)), Color::Red);
        assert_ne!(color(Tone::Active), color(Tone::Inactive));
    }
}
