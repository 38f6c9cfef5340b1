//! Terminal-facing primitives: `ps`, `rs`, `rc`. Grounded on
//! `trac.py`'s `TracConsole.printstr`/`readch` and the `xConsole.readstr`
//! extended-argument handling (`startstr`, `startpoint`).

use tracing::trace;
use trac_terminal::ReadOutcome;
use trac_text::numeric::parsenum;

use crate::{PrimError, PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

pub fn ps(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    ctx.terminal.write(&args[0]).map_err(|e| PrimError::fatal(format!("<ERR> {e}")))?;
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn rc(ctx: &mut PrimitiveContext, _args: &[String]) -> PrimResult {
    match ctx.terminal.read_char() {
        Ok(ReadOutcome::Value(ch)) => Ok(PrimOutcome::Value(PrimValue::str(ch.to_string()))),
        Ok(ReadOutcome::Interrupt) => Ok(PrimOutcome::Interrupt),
        Ok(ReadOutcome::Halt) => Ok(PrimOutcome::Halt),
        Err(e) => Err(PrimError::fatal(format!("<ERR> {e}"))),
    }
}

/// In extended mode, `rs(startstr, startpoint)` seeds the edit buffer with
/// the literal text `startstr` and places the cursor `startpoint`
/// characters into it: a plain (unsigned) `startpoint` counts from the
/// start, a `-`-signed one counts back from the end. Either argument may
/// be omitted (`startstr` defaults to empty, `startpoint` to `0`); the
/// resulting position is clamped to `0..=startstr.len()`.
pub fn rs(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let (initial, cursor_offset) = if ctx.mode.extended {
        let startstr = args.first().map(String::as_str).unwrap_or("");
        let startpoint = args.get(1).map(String::as_str).unwrap_or("");
        let len = startstr.chars().count() as i64;
        let parsed = parsenum(startpoint);
        let mut startnum = parsed.value;
        if parsed.value < 0 || parsed.negative_zero {
            startnum += len;
        }
        let startnum = startnum.clamp(0, len);
        (startstr.to_string(), startnum as usize)
    } else {
        (String::new(), 0)
    };
    let meta = ctx.mode.meta_char;
    match ctx.terminal.read_line("", &initial, cursor_offset, meta) {
        Ok(ReadOutcome::Value(line)) => {
            ctx.mode.rs_history.push(line.clone());
            trace!(target: "form.mutate", history_len = ctx.mode.rs_history.len(), "rs_history_append");
            Ok(PrimOutcome::Value(PrimValue::str(line)))
        }
        Ok(ReadOutcome::Interrupt) => Ok(PrimOutcome::Interrupt),
        Ok(ReadOutcome::Halt) => Ok(PrimOutcome::Halt),
        Err(e) => Err(PrimError::fatal(format!("<ERR> {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use trac_store::{FormStore, ModeState};

    /// Records the `(initial, cursor_offset)` it was asked to seed the edit
    /// buffer with, instead of actually reading anything.
    #[derive(Default)]
    struct RecordingTerminal {
        seen: RefCell<Option<(String, usize)>>,
    }

    impl trac_terminal::TerminalAdapter for RecordingTerminal {
        fn write(&mut self, _t: &str) -> anyhow::Result<()> {
            Ok(())
        }
        fn read_char(&mut self) -> anyhow::Result<ReadOutcome<char>> {
            unimplemented!()
        }
        fn read_line(
            &mut self,
            _prompt: &str,
            initial: &str,
            cursor_offset: usize,
            _meta: char,
        ) -> anyhow::Result<ReadOutcome<String>> {
            *self.seen.borrow_mut() = Some((initial.to_string(), cursor_offset));
            Ok(ReadOutcome::Value(String::new()))
        }
        fn bell(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn console_kind(&self) -> trac_terminal::ConsoleKind {
            trac_terminal::ConsoleKind::Basic
        }
    }

    fn ctx<'a>(store: &'a mut FormStore, mode: &'a mut ModeState, term: &'a mut RecordingTerminal) -> PrimitiveContext<'a> {
        PrimitiveContext { store, mode, terminal: term }
    }

    #[test]
    fn rs_not_extended_ignores_arguments() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        mode.extended = false;
        let mut term = RecordingTerminal::default();
        let mut c = ctx(&mut store, &mut mode, &mut term);
        rs(&mut c, &["hello".into(), "2".into()]).unwrap();
        assert_eq!(*term.seen.borrow(), Some((String::new(), 0)));
    }

    #[test]
    fn rs_extended_unsigned_startpoint_counts_from_start() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        mode.extended = true;
        let mut term = RecordingTerminal::default();
        let mut c = ctx(&mut store, &mut mode, &mut term);
        rs(&mut c, &["hello".into(), "2".into()]).unwrap();
        assert_eq!(*term.seen.borrow(), Some(("hello".to_string(), 2)));
    }

    #[test]
    fn rs_extended_signed_startpoint_counts_from_end() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        mode.extended = true;
        let mut term = RecordingTerminal::default();
        let mut c = ctx(&mut store, &mut mode, &mut term);
        rs(&mut c, &["hello".into(), "-2".into()]).unwrap();
        assert_eq!(*term.seen.borrow(), Some(("hello".to_string(), 3)));
    }

    #[test]
    fn rs_records_successful_reads_in_history() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = RecordingTerminal::default();
        let mut c = ctx(&mut store, &mut mode, &mut term);
        rs(&mut c, &[]).unwrap();
        rs(&mut c, &[]).unwrap();
        assert_eq!(c.mode.rs_history, vec![String::new(), String::new()]);
    }

    #[test]
    fn rs_extended_startpoint_clamps_to_bounds() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        mode.extended = true;
        let mut term = RecordingTerminal::default();
        let mut c = ctx(&mut store, &mut mode, &mut term);
        rs(&mut c, &["hi".into(), "99".into()]).unwrap();
        assert_eq!(*term.seen.borrow(), Some(("hi".to_string(), 2)));
    }
}
