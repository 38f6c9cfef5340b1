//! Mode, trace, and halt primitives, grounded on `trac.py`'s `mode` class
//! and the `tracHalt`/`metachar.set` call sites.

use crate::{PrimError, PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

pub fn cm(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    ctx.mode.set_meta_char(&args[0]).map_err(PrimError::soft)?;
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn tn(ctx: &mut PrimitiveContext, _args: &[String]) -> PrimResult {
    ctx.mode.trace = true;
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn tf(ctx: &mut PrimitiveContext, _args: &[String]) -> PrimResult {
    ctx.mode.trace = false;
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

pub fn hl(_ctx: &mut PrimitiveContext, _args: &[String]) -> PrimResult {
    Ok(PrimOutcome::Halt)
}

/// `mo` with no arguments resets to strict T-64; `mo,e`/`mo,s,...` adjust
/// switches; `mo,ms,c` sets the syntax char; `mo,pm` reports the current
/// bank; `mo,rt,...` is delegated to the terminal adapter (console-kind
/// selection).
pub fn mo(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    if args.is_empty() {
        ctx.mode.reset();
        return Ok(PrimOutcome::Value(PrimValue::Unit));
    }
    match args[0].as_str() {
        "e" | "s" => {
            if args.len() == 1 {
                // Bare `mo,e`: unconditionally enable extensions, no
                // switch bank to parse (trac.py: `mode.extended = True`).
                ctx.mode.extended = true;
                return Ok(PrimOutcome::Value(PrimValue::Unit));
            }
            let switches = args[1].as_str();
            ctx.mode.apply_switches(switches).map_err(PrimError::soft)?;
            Ok(PrimOutcome::Value(PrimValue::Unit))
        }
        "ms" => {
            let candidate = args.get(1).map(String::as_str).unwrap_or("");
            ctx.mode.set_syntax_char(candidate).map_err(PrimError::soft)?;
            Ok(PrimOutcome::Value(PrimValue::Unit))
        }
        "pm" => Ok(PrimOutcome::Value(PrimValue::str(ctx.mode.describe()))),
        "rt" => {
            let code = args.get(1).and_then(|s| s.chars().next()).unwrap_or(' ');
            let kind = trac_terminal::ConsoleKind::from_code(code)
                .ok_or_else(|| PrimError::soft(format!("unrecognized console type '{code}'")))?;
            ctx.terminal.set_console_kind(kind).map_err(PrimError::soft)?;
            Ok(PrimOutcome::Value(PrimValue::Unit))
        }
        other => Err(PrimError::soft(format!("unrecognized mode subcommand '{other}'"))),
    }
}
