//! All TRAC primitives, grouped by the kind of state they touch, plus the
//! [`PrimitiveRegistry`] that resolves a lowercased call name to one of
//! them and pads/truncates its argument list before invocation.
//!
//! A primitive never sees `ModeState`/`FormStore`/terminal directly as free
//! functions; they go through a single borrowed [`PrimitiveContext`], which
//! is `trac-eval`'s way of avoiding process-wide singletons (the source's
//! module-level `mode`, `forms`, `tc` globals become one value passed
//! explicitly, per the design notes).

pub mod arith;
pub mod block;
pub mod boolean;
pub mod control;
pub mod define;
pub mod io;
pub mod modeprim;
pub mod registry;

use trac_store::{FormStore, ModeState};
use trac_terminal::TerminalAdapter;

pub use registry::{PrimitiveRegistry, PrimitiveSpec};

/// Everything a primitive body may read or mutate.
pub struct PrimitiveContext<'a> {
    pub store: &'a mut FormStore,
    pub mode: &'a mut ModeState,
    pub terminal: &'a mut dyn TerminalAdapter,
}

/// What a primitive call produced, before the caller's activeness is
/// factored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimValue {
    /// Plain string result: returned with the caller's own activeness.
    Str(String),
    /// A "default" result that must be evaluated actively regardless of
    /// the caller (e.g. `cc`'s boundary default).
    ForcedActive(String),
    /// No meaningful return value (e.g. `ds`); treated as an empty string.
    Unit,
}

impl PrimValue {
    pub fn str(s: impl Into<String>) -> Self {
        PrimValue::Str(s.into())
    }
}

/// A primitive either produces a value, requests the interpreter halt
/// (`hl`), or observed a user interrupt while blocked on terminal input
/// (`rs`/`rc`). None of these three are errors, so they are kept out of
/// [`PrimError`]; `trac-eval` maps `Halt`/`Interrupt` to the REPL-level
/// signals described in spec §5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimOutcome {
    Value(PrimValue),
    Halt,
    Interrupt,
}

impl From<PrimValue> for PrimOutcome {
    fn from(v: PrimValue) -> Self {
        PrimOutcome::Value(v)
    }
}

/// Raised by a primitive body. `fatal` mirrors the source's `primError`
/// first argument: when true (or when the interpreter is in unforgiving
/// mode), `trac-eval` escalates this to an aborting `<UNF>`/`<STE>`
/// message; otherwise it is swallowed and the call yields the empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimError {
    pub fatal: bool,
    pub message: String,
}

impl PrimError {
    pub fn soft(message: impl Into<String>) -> Self {
        PrimError { fatal: false, message: message.into() }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        PrimError { fatal: true, message: message.into() }
    }
}

pub type PrimResult = Result<PrimOutcome, PrimError>;
