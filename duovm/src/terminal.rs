//! Crossterm-backed [`DuoIo`] implementation: the reference display and
//! input collaborator for the `duovm` binary. Gated behind the `terminal`
//! feature so the core can be embedded headlessly.

use crossterm::event::{self, Event, KeyCode};
use crossterm::{cursor, execute, queue, style, terminal};
use std::io::{self, Write};

use crate::io::{Button, DuoIo};

pub struct TerminalIo {
    out: io::Stdout,
}

impl TerminalIo {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out })
    }
}

impl DuoIo for TerminalIo {
    fn clear(&mut self) {
        let _ = execute!(self.out, terminal::Clear(terminal::ClearType::All));
    }

    fn put_char(&mut self, x: u8, y: u8, ch: u8) {
        let glyph = if ch.is_ascii_graphic() || ch == b' ' { ch as char } else { '.' };
        let _ = queue!(
            self.out,
            cursor::MoveTo(x as u16, y as u16),
            style::Print(glyph)
        );
        let _ = self.out.flush();
    }

    fn read_button(&mut self) -> Button {
        loop {
            if let Ok(Event::Key(key)) = event::read() {
                let button = match key.code {
                    KeyCode::Left | KeyCode::Char('a') => Some(Button::Left),
                    KeyCode::Up | KeyCode::Char('w') => Some(Button::Up),
                    KeyCode::Down | KeyCode::Char('s') => Some(Button::Down),
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Enter => Some(Button::Right),
                    _ => None,
                };
                if let Some(b) = button {
                    return b;
                }
            }
        }
    }
}

impl Drop for TerminalIo {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Restore the terminal outside of the `TerminalIo` lifetime, for use by
/// the fatal-error path in `main` before printing to stderr and exiting.
pub fn restore() {
    let _ = terminal::disable_raw_mode();
    let mut out = io::stdout();
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
}
