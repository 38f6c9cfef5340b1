//! Recursive-descent active-string scanner and call dispatch, a direct
//! translation of `trac.py`'s module-level `parse`/`eval` functions onto
//! an explicit [`Interpreter`] instead of `global syntchar`/`mode`/`tc`.

use thiserror::Error;
use trac_primitives::{PrimError, PrimOutcome, PrimValue, PrimitiveContext};
use trac_terminal::ReadOutcome;

use crate::{Interpreter, MAX_SCAN_DEPTH};

/// What terminated a `parse` call: a comma or close-paren inside an
/// argument list, or the end of the string with neither (a bare top-level
/// scan, or — if it happens inside a call — the unterminated-call error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    Comma,
    CloseParen,
    End,
}

impl Delim {
    /// The literal character this delimiter consumed, for reconstructing
    /// a REPL-level "remainder" string exactly as the source's
    /// `''.join(parse(...))` does.
    pub fn trailing_text(self) -> &'static str {
        match self {
            Delim::Comma => ",",
            Delim::CloseParen => ")",
            Delim::End => "",
        }
    }
}

/// A reported error: shown when `always_show` or the interpreter is
/// unforgiving, otherwise silently swallowed (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracError {
    pub always_show: bool,
    pub message: String,
}

/// Everything that can unwind a `parse`/`eval` call back to the REPL.
#[derive(Debug, Clone, Error)]
pub enum TracSignal {
    #[error("{}", .0.message)]
    Trac(TracError),
    #[error("<SCE> scan/recursion depth exceeded")]
    ScanDepthExceeded,
    #[error("<INT>")]
    Interrupt,
    #[error("halt")]
    Halt,
}

impl TracSignal {
    fn reported(message: impl Into<String>) -> Self {
        TracSignal::Trac(TracError { always_show: true, message: message.into() })
    }
}

fn next_special(s: &str, syntax: char) -> Option<(usize, char)> {
    s.char_indices().find(|&(_, c)| c == syntax || c == '(' || c == ')' || c == ',' || c == '\n')
}

/// `parse(active) -> (neutral, delim, tail)`. `depth` counts nested calls
/// (not parens) and trips `<SCE>` past [`MAX_SCAN_DEPTH`].
pub fn parse(
    interp: &mut Interpreter,
    mut active: String,
    depth: u32,
) -> Result<(String, Delim, String), TracSignal> {
    if depth > MAX_SCAN_DEPTH {
        return Err(TracSignal::ScanDepthExceeded);
    }
    let mut paren_depth: u32 = 0;
    let mut neutral = String::new();
    loop {
        let syntax = interp.mode.syntax_char;
        match next_special(&active, syntax) {
            None => return Ok((neutral + &active, Delim::End, String::new())),
            Some((pos, ch)) => {
                neutral.push_str(&active[..pos]);
                active = active[pos + ch.len_utf8()..].to_string();

                if ch == '(' {
                    if paren_depth > 0 {
                        neutral.push(ch);
                    }
                    paren_depth += 1;
                    continue;
                }
                if paren_depth > 0 {
                    if ch == ')' {
                        paren_depth -= 1;
                        if paren_depth == 0 {
                            continue;
                        }
                    }
                    neutral.push(ch);
                    continue;
                }

                // paren_depth == 0: active scanning proper.
                if ch == '\n' {
                    continue;
                }
                if ch == ',' {
                    return Ok((neutral, Delim::Comma, active));
                }
                if ch == ')' {
                    return Ok((neutral, Delim::CloseParen, active));
                }
                // ch == syntax: decide active vs neutral call, or a bare syntax char.
                let rest = active.clone();
                let active_call = rest.starts_with('(');
                let neutral_call = !active_call && {
                    let mut chars = rest.chars();
                    chars.next() == Some(syntax) && chars.next() == Some('(')
                };
                if !active_call && !neutral_call {
                    neutral.push(ch);
                    continue;
                }
                let is_call_active = active_call;
                active = if active_call {
                    rest[1..].to_string()
                } else {
                    let skip = syntax.len_utf8() + 1;
                    rest[skip..].to_string()
                };

                let mut args = Vec::new();
                loop {
                    let (arg, delim, tail) = parse(interp, active, depth + 1)?;
                    args.push(arg);
                    active = tail;
                    match delim {
                        Delim::Comma => continue,
                        Delim::CloseParen => break,
                        Delim::End => {
                            return Err(TracSignal::reported(
                                "<UNF> hit end of string while expecting ')'",
                            ))
                        }
                    }
                }
                let (result, became_active) = eval(interp, &args, is_call_active)?;
                if became_active {
                    active = format!("{result}{active}");
                } else {
                    neutral.push_str(&result);
                }
                continue;
            }
        }
    }
}

fn run_trace(interp: &mut Interpreter, args: &[String], act: bool) -> Result<(), TracSignal> {
    let s = interp.mode.syntax_char;
    let s_str = s.to_string();
    let mut line = format!("{}{}/{}", s, if act { "" } else { &s_str }, args[0]);
    for a in &args[1..] {
        line.push_str(&format!(" *{a}"));
    }
    line.push_str(" / ");
    let _ = interp.terminal_mut().write(&line);
    match interp.terminal_mut().read_line("", "", 0, '\n') {
        Ok(ReadOutcome::Value(input)) if input.trim_end_matches('\n').is_empty() => Ok(()),
        Ok(ReadOutcome::Value(_)) => {
            interp.mode.trace = false;
            Err(TracSignal::Interrupt)
        }
        Ok(ReadOutcome::Interrupt) => Err(TracSignal::Interrupt),
        Ok(ReadOutcome::Halt) => Err(TracSignal::Halt),
        Err(_) => Err(TracSignal::reported("<ERR> trace input failed")),
    }
}

fn wrap_prim_error(name: &str, e: PrimError) -> TracSignal {
    TracSignal::reported(format!("<UNF> ({name}) {}", e.message))
}

/// `eval(arglist, act) -> (result, activeness)`.
fn eval(interp: &mut Interpreter, args: &[String], act: bool) -> Result<(String, bool), TracSignal> {
    if interp.mode.trace {
        run_trace(interp, args, act)?;
    }

    let pname = args[0].to_lowercase();
    if let Some(spec) = interp.registry.get(pname.as_str()).copied() {
        if interp.mode.extended || !spec.extended {
            let given = args.len() - 1;
            if interp.mode.unforgiving {
                if let Err(msg) = spec.check_arity(given) {
                    return Err(TracSignal::reported(format!("<UNF> ({}) {msg}", spec.name)));
                }
            }
            let call_args = spec.adjust_args(args[1..].to_vec());
            let mut ctx = PrimitiveContext {
                store: &mut interp.store,
                mode: &mut interp.mode,
                terminal: interp.terminal.as_mut(),
            };
            return match (spec.func)(&mut ctx, &call_args) {
                Ok(PrimOutcome::Value(PrimValue::Str(s))) => Ok((s, act)),
                Ok(PrimOutcome::Value(PrimValue::ForcedActive(s))) => Ok((s, true)),
                Ok(PrimOutcome::Value(PrimValue::Unit)) => Ok((String::new(), act)),
                Ok(PrimOutcome::Halt) => Err(TracSignal::Halt),
                Ok(PrimOutcome::Interrupt) => Err(TracSignal::Interrupt),
                Err(e) => {
                    if e.fatal || interp.mode.unforgiving {
                        Err(wrap_prim_error(spec.name, e))
                    } else {
                        Ok((String::new(), act))
                    }
                }
            };
        }
    }

    // Not a (currently active) primitive: an implied call, dispatched as
    // `cl(name, arg1, ...)` with activeness forced to active.
    interp.mode.implied_active = act;
    let cl_spec = *interp.registry.get("cl").expect("cl is always registered");
    let call_args = cl_spec.adjust_args(args.to_vec());
    let mut ctx =
        PrimitiveContext { store: &mut interp.store, mode: &mut interp.mode, terminal: interp.terminal.as_mut() };
    match (cl_spec.func)(&mut ctx, &call_args) {
        Ok(PrimOutcome::Value(PrimValue::Str(s))) => Ok((s, true)),
        Ok(_) => Ok((String::new(), true)),
        Err(e) => {
            if e.fatal || interp.mode.unforgiving {
                Err(wrap_prim_error("cl", e))
            } else {
                Ok((String::new(), true))
            }
        }
    }
}
