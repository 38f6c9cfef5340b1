//! Form-store-facing primitives: define, segment, call, and the
//! positional-cursor operations. Grounded on `trac.py`'s `form` static
//! methods (`find`, `callCharacter`, `callN`, `callSeg`, `initial`,
//! `deletedef`, `deleteall`).

use tracing::trace;
use trac_text::numeric::parsenum;
use trac_text::Form;

use crate::{PrimError, PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

fn fnf_error(name: &str) -> PrimError {
    PrimError::soft(format!("form not found ({name})"))
}

fn find<'a>(ctx: &'a PrimitiveContext, name: &str) -> Result<&'a Form, PrimError> {
    ctx.store.get(name).ok_or_else(|| fnf_error(name))
}

fn find_mut<'a>(ctx: &'a mut PrimitiveContext, name: &str) -> Result<&'a mut Form, PrimError> {
    ctx.store.get_mut(name).ok_or_else(|| fnf_error(name))
}

pub fn ds(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    ctx.store.define(&args[0], &args[1]);
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn dd(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let missing = ctx.store.delete(args, ctx.mode.unforgiving);
    if ctx.mode.unforgiving {
        if let Some(name) = missing.first() {
            return Err(fnf_error(name));
        }
    }
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn da(ctx: &mut PrimitiveContext, _args: &[String]) -> PrimResult {
    ctx.store.delete_all();
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn ss(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let f = find_mut(ctx, &args[0])?;
    f.segment(&args[1..]);
    trace!(target: "form.mutate", name = %args[0], "segment");
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn cl(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let f = find(ctx, &args[0])?;
    Ok(PrimOutcome::Value(PrimValue::str(f.val(&args[1..]))))
}

pub fn cr(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let f = find_mut(ctx, &args[0])?;
    f.reset_pointer();
    trace!(target: "form.mutate", name = %args[0], "reset_pointer");
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn cc(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let default = args[1].clone();
    let f = find_mut(ctx, &args[0])?;
    match f.call_character() {
        Some(ch) => Ok(PrimOutcome::Value(PrimValue::str(ch.to_string()))),
        None => Ok(PrimOutcome::Value(PrimValue::ForcedActive(default))),
    }
}

pub fn cs(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let default = args[1].clone();
    let f = find_mut(ctx, &args[0])?;
    match f.call_seg() {
        Some(s) => Ok(PrimOutcome::Value(PrimValue::str(s))),
        None => Ok(PrimOutcome::Value(PrimValue::ForcedActive(default))),
    }
}

pub fn cn(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let parsed = parsenum(&args[1]);
    let default = args[2].clone();
    let f = find_mut(ctx, &args[0])?;
    match f.call_n(parsed.value, parsed.negative_zero || parsed.value < 0) {
        Some(s) => Ok(PrimOutcome::Value(PrimValue::str(s))),
        None => Ok(PrimOutcome::Value(PrimValue::ForcedActive(default))),
    }
}

pub fn in_(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let needle = args[1].clone();
    let default = args[2].clone();
    let f = find_mut(ctx, &args[0])?;
    match f.initial(&needle) {
        Some(s) => Ok(PrimOutcome::Value(PrimValue::str(s))),
        None => Ok(PrimOutcome::Value(PrimValue::ForcedActive(default))),
    }
}

pub fn ln(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let names = ctx.store.names();
    Ok(PrimOutcome::Value(PrimValue::str(names.join(&args[0]))))
}

pub fn pf(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let f = find(ctx, &args[0])?;
    let rendered = format!("{f}");
    ctx.terminal.write(&rendered).map_err(|e| PrimError::fatal(format!("<ERR> {e}")))?;
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trac_store::{FormStore, ModeState};
    use trac_terminal::basic::BasicAdapter;

    // `BasicAdapter::new` enters raw mode, which is unavailable under a
    // headless test runner; primitive tests exercise the form/store logic
    // directly instead of through a real terminal.
    struct NullTerminal;
    impl trac_terminal::TerminalAdapter for NullTerminal {
        fn write(&mut self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        fn read_char(&mut self) -> anyhow::Result<trac_terminal::ReadOutcome<char>> {
            Ok(trac_terminal::ReadOutcome::Halt)
        }
        fn read_line(
            &mut self,
            _prompt: &str,
            _initial: &str,
            _cursor_offset: usize,
            _meta_char: char,
        ) -> anyhow::Result<trac_terminal::ReadOutcome<String>> {
            Ok(trac_terminal::ReadOutcome::Halt)
        }
        fn bell(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn console_kind(&self) -> trac_terminal::ConsoleKind {
            trac_terminal::ConsoleKind::Basic
        }
    }

    fn ctx<'a>(store: &'a mut FormStore, mode: &'a mut ModeState, term: &'a mut NullTerminal) -> PrimitiveContext<'a> {
        PrimitiveContext { store, mode, terminal: term }
    }

    #[test]
    fn ds_then_cl_round_trips() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        ds(&mut c, &["a".into(), "hello".into()]).unwrap();
        let out = cl(&mut c, &["a".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("hello")));
    }

    #[test]
    fn cc_forces_active_default_at_end() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        ds(&mut c, &["a".into(), "".into()]).unwrap();
        let out = cc(&mut c, &["a".into(), "DEF".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::ForcedActive("DEF".into())));
    }

    #[test]
    fn cn_routes_negative_zero_leftward() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        ds(&mut c, &["a".into(), "hi".into()]).unwrap();
        cn(&mut c, &["a".into(), "2".into(), "D".into()]).unwrap();
        let out = cn(&mut c, &["a".into(), "-".into(), "D".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("")));
    }

    #[test]
    fn missing_form_is_soft_error() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        let err = cl(&mut c, &["nope".into()]).unwrap_err();
        assert!(!err.fatal);
    }

    #[test]
    fn dd_reports_missing_only_when_unforgiving() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        assert!(dd(&mut c, &["ghost".into()]).is_ok());
        c.mode.unforgiving = true;
        assert!(dd(&mut c, &["ghost".into()]).is_err());
    }

    #[test]
    fn dd_unforgiving_stops_at_first_missing_name() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = NullTerminal;
        let mut c = ctx(&mut store, &mut mode, &mut term);
        ds(&mut c, &["present1".into(), "a".into()]).unwrap();
        ds(&mut c, &["present2".into(), "b".into()]).unwrap();
        c.mode.unforgiving = true;
        let err = dd(&mut c, &["present1".into(), "missing".into(), "present2".into()]).unwrap_err();
        assert!(!err.fatal);
        assert!(!c.store.contains("present1"));
        assert!(c.store.contains("present2"), "names after the first miss must be left untouched");
    }
}
