//! Block (file) persistence primitives: `sb`/`fb`/`eb`. The actual
//! encoding lives in `trac-persist`; this module only resolves form names
//! against the store and maps its `BlockError` to a fatal `<STE>`
//! [`PrimError`] (spec §4.4: IO failure is always fatal).

use trac_persist::BlockError;

use crate::{PrimError, PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

fn ste(e: BlockError) -> PrimError {
    PrimError::fatal(e.to_string())
}

/// `sb(path, name1, …)`: serialize the named forms (deduplicated,
/// order-preserved) and remove them from the store.
pub fn sb(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let path = &args[0];
    let mut names: Vec<&str> = Vec::new();
    for n in &args[1..] {
        if !names.contains(&n.as_str()) {
            names.push(n.as_str());
        }
    }
    let mut missing = Vec::new();
    let forms: Vec<_> = names
        .iter()
        .filter_map(|n| match ctx.store.get(n) {
            Some(f) => Some(f),
            None => {
                missing.push(*n);
                None
            }
        })
        .collect();
    if !missing.is_empty() && ctx.mode.unforgiving {
        return Err(PrimError::soft(format!("form not found ({})", missing[0])));
    }
    trac_persist::store(path, &forms).map_err(ste)?;
    let owned_names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    for n in &owned_names {
        ctx.store.take(n);
    }
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

fn require_path(args: &[String]) -> Result<&str, PrimError> {
    match args.first() {
        Some(p) => Ok(p.as_str()),
        None => Err(PrimError::soft("missing block path argument")),
    }
}

/// `fb(path)`: deserialize and merge, overwriting any existing form of the
/// same name.
pub fn fb(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let path = require_path(args)?;
    let forms = trac_persist::fetch(path).map_err(ste)?;
    for f in forms {
        ctx.store.insert(f);
    }
    Ok(PrimOutcome::Value(PrimValue::Unit))
}

/// `eb(path)`: delete the block file.
pub fn eb(_ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let path = require_path(args)?;
    trac_persist::erase(path).map_err(ste)?;
    Ok(PrimOutcome::Value(PrimValue::Unit))
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

    #[test]
    fn fb_with_no_arguments_is_a_soft_error() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = Null;
        let mut c = PrimitiveContext { store: &mut store, mode: &mut mode, terminal: &mut term };
        let err = fb(&mut c, &[]).unwrap_err();
        assert!(!err.fatal);
    }

    #[test]
    fn eb_with_no_arguments_is_a_soft_error() {
        let mut store = FormStore::new();
        let mut mode = ModeState::new();
        let mut term = Null;
        let mut c = PrimitiveContext { store: &mut store, mode: &mut mode, terminal: &mut term };
        let err = eb(&mut c, &[]).unwrap_err();
        assert!(!err.fatal);
    }
}
