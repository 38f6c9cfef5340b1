//! Shared raw-mode key acquisition. `crossterm` is the portable stand-in
//! for the OS-specific raw-key code the spec marks out of scope.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::Write;

use crate::ReadOutcome;

/// RAII guard enabling raw mode for the lifetime of a console adapter.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard { active: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
        }
    }
}

/// A single decoded key press, reduced to what the console backends act
/// on. Navigation keys only matter to the `Line` backend; `Basic` ignores
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKey {
    Char(char),
    Backspace,
    Enter,
    Left,
    Right,
    Home,
    End,
}

/// Block for the next key press, translating Ctrl-C/Ctrl-D and
/// normalizing CR (13) to LF, matching `TracConsole.inkey`.
pub fn read_key() -> Result<ReadOutcome<RawKey>> {
    loop {
        if let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? {
            if kind == KeyEventKind::Release {
                continue;
            }
            if modifiers.contains(KeyModifiers::CONTROL) {
                match code {
                    KeyCode::Char('c') => return Ok(ReadOutcome::Interrupt),
                    KeyCode::Char('d') => return Ok(ReadOutcome::Halt),
                    _ => {}
                }
            }
            let key = match code {
                KeyCode::Char(c) => RawKey::Char(c),
                KeyCode::Enter => RawKey::Enter,
                KeyCode::Backspace => RawKey::Backspace,
                KeyCode::Tab => RawKey::Char('\t'),
                KeyCode::Left => RawKey::Left,
                KeyCode::Right => RawKey::Right,
                KeyCode::Home => RawKey::Home,
                KeyCode::End => RawKey::End,
                _ => continue,
            };
            return Ok(ReadOutcome::Value(key));
        }
    }
}

pub fn echo(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}

/// Non-blocking check for an already-buffered Enter key, consuming it if
/// present. Used to eat the newline that typically follows a non-newline
/// meta character (spec §6: "if the next character is newline, that
/// newline is consumed"). Best-effort: a different buffered key is
/// consumed and dropped rather than pushed back, since crossterm has no
/// ungetch; acceptable because the history/editing buffer this stands in
/// for is explicitly out of scope.
pub fn try_consume_trailing_newline() -> Result<()> {
    if event::poll(std::time::Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}
