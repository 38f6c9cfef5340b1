//! Octal-Boolean primitives: `bu`/`bi`/`bc`/`br`/`bs`, grounded on
//! `trac.py`'s `boolprim` class. Each operand's value and *width* come
//! from the longest trailing run of octal digits; everything before that
//! run is ignored (not preserved as a prefix, unlike the arithmetic
//! primitives).

use trac_text::numeric::tracint;

use crate::{PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

/// `(value, width)` of the trailing octal-digit run in `arg`.
fn parse_bool(arg: &str) -> (i64, usize) {
    let bytes = arg.as_bytes();
    let mut start = bytes.len();
    while start > 0 && (b'0'..=b'7').contains(&bytes[start - 1]) {
        start -= 1;
    }
    let digits = &arg[start..];
    let width = digits.len();
    let value = if width == 0 { 0 } else { i64::from_str_radix(digits, 8).unwrap_or(0) };
    (value, width)
}

fn to_oct(bits: i64, width: usize) -> String {
    if width == 0 {
        String::new()
    } else {
        format!("{bits:0width$o}")
    }
}

fn mask(width: usize) -> i64 {
    (1i64 << (width * 3)) - 1
}

pub fn bu(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let (v1, w1) = parse_bool(&args[0]);
    let (v2, w2) = parse_bool(&args[1]);
    Ok(PrimOutcome::Value(PrimValue::str(to_oct(v1 | v2, w1.max(w2)))))
}

pub fn bi(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let (v1, w1) = parse_bool(&args[0]);
    let (v2, w2) = parse_bool(&args[1]);
    Ok(PrimOutcome::Value(PrimValue::str(to_oct(v1 & v2, w1.min(w2)))))
}

pub fn bc(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let (v, w) = parse_bool(&args[0]);
    Ok(PrimOutcome::Value(PrimValue::str(to_oct(mask(w) & !v, w))))
}

pub fn br(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let n = tracint(&args[0]);
    let (v, w) = parse_bool(&args[1]);
    let nbits = (w * 3) as i64;
    if nbits == 0 {
        return Ok(PrimOutcome::Value(PrimValue::str(String::new())));
    }
    let rotleft = n.rem_euclid(nbits);
    let rotated = ((v << rotleft) & mask(w)) | (v >> (nbits - rotleft));
    Ok(PrimOutcome::Value(PrimValue::str(to_oct(rotated, w))))
}

pub fn bs(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let n = tracint(&args[0]);
    let (v, w) = parse_bool(&args[1]);
    let nbits = (w * 3) as i64;
    let shifted = if n >= 0 {
        if n < nbits {
            (v << n) & mask(w)
        } else {
            0
        }
    } else {
        let n = -n;
        if n < nbits {
            v >> n
        } else {
            0
        }
    };
    Ok(PrimOutcome::Value(PrimValue::str(to_oct(shifted, w))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trac_store::{FormStore, ModeState};

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

    fn ctx<'a>(store: &'a mut FormStore, mode: &'a mut ModeState) -> PrimitiveContext<'a> {
        let term: &'static mut Null = Box::leak(Box::new(Null));
        PrimitiveContext { store, mode, terminal: term }
    }

    #[test]
    fn bu_widens_to_the_wider_operand() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut c = ctx(&mut store, &mut mode);
        let out = bu(&mut c, &["7".into(), "10".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("17")));
    }

    #[test]
    fn bc_complements_within_width() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut c = ctx(&mut store, &mut mode);
        let out = bc(&mut c, &["7".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("0")));
    }

    #[test]
    fn bs_shifts_left_positive() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut c = ctx(&mut store, &mut mode);
        let out = bs(&mut c, &["2".into(), "1".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("4")));
    }

    #[test]
    fn bs_beyond_width_collapses_to_zero() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut c = ctx(&mut store, &mut mode);
        let out = bs(&mut c, &["10".into(), "1".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("0")));
    }

    #[test]
    fn br_rotates_within_width() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut c = ctx(&mut store, &mut mode);
        let out = br(&mut c, &["1".into(), "4".into()]).unwrap();
        assert_eq!(out, PrimOutcome::Value(PrimValue::str("1")));
    }
}
