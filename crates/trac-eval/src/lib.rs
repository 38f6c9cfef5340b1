//! The active-string scanner/evaluator and the [`Interpreter`] that owns
//! every piece of process-wide state the source kept as module globals
//! (`forms`, `mode`, `tc`, `activeImpliedCall`) — folded here into one
//! value per the design notes, passed explicitly rather than reached for
//! through singletons.

mod scanner;

pub use scanner::{Delim, TracError, TracSignal};

use tracing::warn;
use trac_primitives::PrimitiveRegistry;
use trac_store::{FormStore, ModeState};
use trac_terminal::TerminalAdapter;

/// What a single top-level evaluation cycle produced, for the REPL driver
/// to print (spec §7: these are caught at the REPL boundary, never abort
/// the process except `Halted`).
#[derive(Debug)]
pub enum EvalOutcome {
    /// The active string fully expanded with nothing left over.
    Completed,
    /// Non-empty text remained after parsing (spec §6: stray `)`/`,` or an
    /// implied call's result that never got absorbed).
    UnbalancedParens(String),
    /// A reported `TracError`/`PrimError`, pre-formatted for display.
    Error(String),
    /// Ctrl-C while blocked on `rs`/`rc`, or a non-empty trace-line input.
    Interrupted,
    /// Recursion/scan depth guard tripped.
    ScanOverflow,
    /// `hl` or Ctrl-D: the REPL should stop looping.
    Halted,
}

/// Recursion cap on nested `#(...)` calls (spec §5: "a reasonable cap is
/// 1-10 thousand nested calls").
pub const MAX_SCAN_DEPTH: u32 = 4000;

pub struct Interpreter {
    pub store: FormStore,
    pub mode: ModeState,
    registry: PrimitiveRegistry,
    terminal: Box<dyn TerminalAdapter>,
}

impl Interpreter {
    pub fn new(terminal: Box<dyn TerminalAdapter>) -> Self {
        Interpreter {
            store: FormStore::new(),
            mode: ModeState::new(),
            registry: PrimitiveRegistry::standard(),
            terminal,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut dyn TerminalAdapter {
        self.terminal.as_mut()
    }

    /// Run one full scan of `active` to completion and report what
    /// happened. Always finishes with a (non-aborting) validation pass
    /// over every form, per spec §7.
    pub fn evaluate(&mut self, active: &str) -> EvalOutcome {
        let outcome = match scanner::parse(self, active.to_string(), 0) {
            Ok((neutral, delim, tail)) => {
                let remainder = format!("{neutral}{}{tail}", delim.trailing_text());
                if remainder.is_empty() {
                    EvalOutcome::Completed
                } else {
                    EvalOutcome::UnbalancedParens(remainder)
                }
            }
            Err(TracSignal::Trac(e)) => {
                if e.always_show || self.mode.unforgiving {
                    EvalOutcome::Error(e.message)
                } else {
                    EvalOutcome::Completed
                }
            }
            Err(TracSignal::ScanDepthExceeded) => EvalOutcome::ScanOverflow,
            Err(TracSignal::Interrupt) => EvalOutcome::Interrupted,
            Err(TracSignal::Halt) => EvalOutcome::Halted,
        };
        for issue in self.store.validate_all() {
            warn!(target: "form.validate", issue);
        }
        outcome
    }
}
