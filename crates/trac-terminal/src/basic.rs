//! The `b` console: the simplest backend, for terminals without
//! escape-sequence support. Backspace overtypes with a space; there is no
//! mid-line cursor movement (arrow keys are ignored, matching Mooers'
//! original `BasicConsole`).

use anyhow::Result;

use crate::raw::{self, RawKey, RawModeGuard};
use crate::{ConsoleKind, ReadOutcome, TerminalAdapter};

pub struct BasicAdapter {
    _guard: RawModeGuard,
}

impl BasicAdapter {
    pub fn new() -> Result<Self> {
        Ok(BasicAdapter { _guard: RawModeGuard::enter()? })
    }
}

impl TerminalAdapter for BasicAdapter {
    fn write(&mut self, text: &str) -> Result<()> {
        raw::echo(text)
    }

    fn read_char(&mut self) -> Result<ReadOutcome<char>> {
        loop {
            return Ok(match raw::read_key()? {
                ReadOutcome::Interrupt => ReadOutcome::Interrupt,
                ReadOutcome::Halt => ReadOutcome::Halt,
                ReadOutcome::Value(RawKey::Enter) => {
                    raw::echo("\n")?;
                    ReadOutcome::Value('\n')
                }
                ReadOutcome::Value(RawKey::Char(c)) => {
                    raw::echo(&c.to_string())?;
                    ReadOutcome::Value(c)
                }
                ReadOutcome::Value(_) => continue,
            });
        }
    }

    fn read_line(
        &mut self,
        prompt: &str,
        initial: &str,
        _cursor_offset: usize,
        meta_char: char,
    ) -> Result<ReadOutcome<String>> {
        raw::echo(prompt)?;
        raw::echo(initial)?;
        let mut buf = initial.to_string();
        loop {
            let key = match raw::read_key()? {
                ReadOutcome::Interrupt => return Ok(ReadOutcome::Interrupt),
                ReadOutcome::Halt => return Ok(ReadOutcome::Halt),
                ReadOutcome::Value(key) => key,
            };
            let ch = match key {
                RawKey::Backspace => {
                    if buf.pop().is_some() {
                        raw::echo("\u{8} \u{8}")?;
                    } else {
                        self.bell()?;
                    }
                    continue;
                }
                RawKey::Enter => '\n',
                RawKey::Char(c) => c,
                RawKey::Left | RawKey::Right | RawKey::Home | RawKey::End => continue,
            };
            raw::echo(&ch.to_string())?;
            if ch == meta_char {
                if meta_char != '\n' {
                    raw::try_consume_trailing_newline()?;
                }
                return Ok(ReadOutcome::Value(buf));
            }
            buf.push(ch);
        }
    }

    fn bell(&mut self) -> Result<()> {
        raw::echo("\u{7}")
    }

    fn console_kind(&self) -> ConsoleKind {
        ConsoleKind::Basic
    }
}
