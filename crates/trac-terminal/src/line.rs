//! The `l` console: a line editor with left/right/home/end cursor
//! movement, used to honor `read_line`'s `cursor_offset` seed (needed so
//! extended `RS` can recall and re-edit a history entry in place).

use anyhow::Result;

use crate::raw::{self, RawKey, RawModeGuard};
use crate::{ConsoleKind, ReadOutcome, TerminalAdapter};

pub struct LineAdapter {
    _guard: RawModeGuard,
}

impl LineAdapter {
    pub fn new() -> Result<Self> {
        Ok(LineAdapter { _guard: RawModeGuard::enter()? })
    }

    /// Redraw `buf` with the cursor positioned after `cursor` characters,
    /// having just cleared `prev_len` previously drawn characters.
    fn redraw(&self, buf: &[char], cursor: usize, prev_len: usize) -> Result<()> {
        raw::echo("\r")?;
        raw::echo(&" ".repeat(prev_len))?;
        raw::echo("\r")?;
        let rendered: String = buf.iter().collect();
        raw::echo(&rendered)?;
        if cursor < buf.len() {
            let back = buf.len() - cursor;
            raw::echo(&"\u{8}".repeat(back))?;
        }
        Ok(())
    }
}

impl TerminalAdapter for LineAdapter {
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
        cursor_offset: usize,
        meta_char: char,
    ) -> Result<ReadOutcome<String>> {
        raw::echo(prompt)?;
        let mut buf: Vec<char> = initial.chars().collect();
        let mut cursor = cursor_offset.min(buf.len());
        self.redraw(&buf, cursor, 0)?;
        loop {
            let key = match raw::read_key()? {
                ReadOutcome::Interrupt => return Ok(ReadOutcome::Interrupt),
                ReadOutcome::Halt => return Ok(ReadOutcome::Halt),
                ReadOutcome::Value(key) => key,
            };
            let prev_len = buf.len();
            match key {
                RawKey::Backspace => {
                    if cursor == 0 {
                        self.bell()?;
                        continue;
                    }
                    cursor -= 1;
                    buf.remove(cursor);
                }
                RawKey::Left => {
                    cursor = cursor.saturating_sub(1);
                }
                RawKey::Right => {
                    cursor = (cursor + 1).min(buf.len());
                }
                RawKey::Home => cursor = 0,
                RawKey::End => cursor = buf.len(),
                RawKey::Enter if meta_char == '\n' => {
                    raw::echo("\n")?;
                    return Ok(ReadOutcome::Value(buf.into_iter().collect()));
                }
                RawKey::Enter => {
                    buf.insert(cursor, '\n');
                    cursor += 1;
                }
                RawKey::Char(c) if c == meta_char => {
                    raw::echo(&c.to_string())?;
                    if meta_char != '\n' {
                        raw::try_consume_trailing_newline()?;
                    }
                    raw::echo("\n")?;
                    return Ok(ReadOutcome::Value(buf.into_iter().collect()));
                }
                RawKey::Char(c) => {
                    buf.insert(cursor, c);
                    cursor += 1;
                }
            }
            self.redraw(&buf, cursor, prev_len)?;
        }
    }

    fn bell(&mut self) -> Result<()> {
        raw::echo("\u{7}")
    }

    fn console_kind(&self) -> ConsoleKind {
        ConsoleKind::Line
    }
}
