//! Terminal backend abstraction.
//!
//! The evaluator never talks to a screen directly (spec: the interactive
//! terminal — line-oriented, basic, and full-cursor ANSI variants with
//! history and screen polling — is an external collaborator). It only
//! needs [`TerminalAdapter`]'s four operations. This crate supplies the
//! `Basic` and `Line` console kinds (Mooers' original two) behind that
//! trait; the full-cursor ANSI variant is a documented extension point
//! (`ConsoleKind::Full`) that a real screen-editing frontend would
//! implement outside this crate.

pub mod basic;
pub mod line;
pub mod raw;

use anyhow::Result;

/// Outcome of a blocking read: a value, a user interrupt (Ctrl-C), or
/// end-of-input (Ctrl-D), which the REPL maps to `<INT>` / `tracHalt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Value(T),
    Interrupt,
    Halt,
}

/// `#(mo,rt,c)` console-type selector. Only `Basic` and `Line` are
/// implemented here; `Full` is a seam for a full-cursor ANSI frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    Basic,
    Line,
    Full,
}

impl ConsoleKind {
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(ConsoleKind::Basic),
            'l' => Some(ConsoleKind::Line),
            'x' | 'v' => Some(ConsoleKind::Full),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ConsoleKind::Basic => 'b',
            ConsoleKind::Line => 'l',
            ConsoleKind::Full => 'x',
        }
    }
}

/// The collaborator the scanner/evaluator calls back into for `PS`, `RS`,
/// and `RC`.
pub trait TerminalAdapter {
    /// Unconditional echo (`PS` and the neutral residue printed each cycle).
    fn write(&mut self, text: &str) -> Result<()>;

    /// Read and echo a single character (`RC`). CR (code 13) is normalized
    /// to LF before being returned.
    fn read_char(&mut self) -> Result<ReadOutcome<char>>;

    /// Read a line (`RS`), seeded with `initial` and an edit cursor at
    /// `cursor_offset` chars in. Reading stops at `meta_char`; if
    /// `meta_char` is not itself `\n` and is immediately followed by `\n`,
    /// that `\n` is consumed along with it.
    fn read_line(
        &mut self,
        prompt: &str,
        initial: &str,
        cursor_offset: usize,
        meta_char: char,
    ) -> Result<ReadOutcome<String>>;

    fn bell(&mut self) -> Result<()>;

    /// `#(mo,rt,c)`: switch console type. Default: unsupported kinds are
    /// reported back to the primitive layer as an error string.
    fn set_console_kind(&mut self, kind: ConsoleKind) -> Result<(), String> {
        if kind == ConsoleKind::Full {
            Err("full-cursor console not available in this build".to_string())
        } else {
            Ok(())
        }
    }

    fn console_kind(&self) -> ConsoleKind;
}
