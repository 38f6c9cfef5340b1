//! Integer arithmetic and comparison, grounded on `trac.py`'s `mathprim`
//! class. The numeric literal grammar and prefix-preservation lives in
//! `trac_text::numeric`; this module only supplies the five operations and
//! the two comparisons.

use trac_text::numeric::{parsenum, tracint};

use crate::{PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

fn math(args: &[String], op: impl Fn(i64, i64) -> Option<i64>) -> PrimResult {
    let parsed = parsenum(&args[0]);
    let y = tracint(&args[1]);
    match op(parsed.value, y) {
        Some(v) => Ok(PrimOutcome::Value(PrimValue::str(format!("{}{v}", parsed.prefix)))),
        // divide-by-zero (`dv`/`rm`): the third argument, forced active.
        None => Ok(PrimOutcome::Value(PrimValue::ForcedActive(args[2].clone()))),
    }
}

pub fn ad(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    math(args, |x, y| Some(x + y))
}

pub fn su(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    math(args, |x, y| Some(x - y))
}

pub fn ml(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    math(args, |x, y| Some(x * y))
}

/// Python's `//`: floors toward negative infinity (unlike Rust's `/`,
/// which truncates toward zero).
fn floor_div(x: i64, y: i64) -> i64 {
    let q = x / y;
    let r = x % y;
    if r != 0 && (r < 0) != (y < 0) {
        q - 1
    } else {
        q
    }
}

/// Python's `%`: sign follows the divisor.
fn floor_mod(x: i64, y: i64) -> i64 {
    let r = x % y;
    if r != 0 && (r < 0) != (y < 0) {
        r + y
    } else {
        r
    }
}

pub fn dv(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    math(args, |x, y| if y == 0 { None } else { Some(floor_div(x, y)) })
}

pub fn rm(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    math(args, |x, y| if y == 0 { None } else { Some(floor_mod(x, y)) })
}

pub fn eq(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let branch = if args[0] == args[1] { &args[2] } else { &args[3] };
    Ok(PrimOutcome::Value(PrimValue::str(branch.clone())))
}

pub fn gr(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let branch = if tracint(&args[0]) > tracint(&args[1]) { &args[2] } else { &args[3] };
    Ok(PrimOutcome::Value(PrimValue::str(branch.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trac_store::{FormStore, ModeState};

    fn dummy_ctx<'a>(store: &'a mut FormStore, mode: &'a mut ModeState) -> PrimitiveContext<'a> {
        struct Null;
        impl trac_terminal::TerminalAdapter for Null {
            fn write(&mut self, _t: &str) -> anyhow::Result<()> {
                Ok(())
            }
            fn read_char(&mut self) -> anyhow::Result<trac_terminal::ReadOutcome<char>> {
                unimplemented!()
            }
            fn read_line(
                &mut self,
                _p: &str,
                _i: &str,
                _c: usize,
                _m: char,
            ) -> anyhow::Result<trac_terminal::ReadOutcome<String>> {
                unimplemented!()
            }
            fn bell(&mut self) -> anyhow::Result<()> {
                Ok(())
            }
            fn console_kind(&self) -> trac_terminal::ConsoleKind {
                trac_terminal::ConsoleKind::Basic
            }
        }
        // leaked so the borrow can outlive this helper call in tests
        let term: &'static mut Null = Box::leak(Box::new(Null));
        PrimitiveContext { store, mode, terminal: term }
    }

    #[test]
    fn ad_preserves_prefix() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut ctx = dummy_ctx(&mut store, &mut mode);
        let out = ad(&mut ctx, &["x12".into(), "3".into(), "".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("x15")));
    }

    #[test]
    fn dv_by_zero_forces_active_default() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut ctx = dummy_ctx(&mut store, &mut mode);
        let out = dv(&mut ctx, &["5".into(), "0".into(), "oops".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::ForcedActive("oops".into())));
    }

    #[test]
    fn gr_compares_numerically_not_lexically() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut ctx = dummy_ctx(&mut store, &mut mode);
        let out = gr(&mut ctx, &["9".into(), "10".into(), "yes".into(), "no".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("no")));
    }

    #[test]
    fn eq_compares_as_strings() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut ctx = dummy_ctx(&mut store, &mut mode);
        let out = eq(&mut ctx, &["07".into(), "7".into(), "yes".into(), "no".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("no")));
    }
}
