//! TRAC entrypoint: wires a terminal backend to an `Interpreter` and runs
//! the read-eval-print cycle described in spec §6.

mod config;

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use trac_eval::{EvalOutcome, Interpreter};
use trac_terminal::{TerminalAdapter, basic::BasicAdapter, line::LineAdapter};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "trac", version, about = "TRAC T-64 macro processor")]
struct Args {
    /// Optional path to a `trac.toml` configuration file (overrides
    /// discovery of `./trac.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Console backend: `basic` (no cursor movement) or `line` (in-place
    /// editing). Defaults to `line`.
    #[arg(long = "console", default_value = "line")]
    console: String,

    /// `-mo[,arg…]` startup tokens, applied as if typed at the prompt
    /// (spec §6), e.g. `-mo,e,pu` enables unforgiving mode.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    startup: Vec<String>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("trac.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "trac.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => self.log_guard = Some(guard),
            Err(_err) => {
                // Global subscriber already installed (e.g. in tests).
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn build_terminal(kind: &str) -> Result<Box<dyn TerminalAdapter>> {
    match kind {
        "basic" => Ok(Box::new(BasicAdapter::new()?)),
        "line" => Ok(Box::new(LineAdapter::new()?)),
        other => anyhow::bail!("unknown console backend: {other} (expected basic or line)"),
    }
}

fn apply_startup_tokens(interp: &mut Interpreter, tokens: &[String]) {
    for token in tokens {
        let body = token.trim_start_matches('-');
        let syntax = interp.mode.syntax_char;
        let call = format!("{syntax}({body})");
        info!(target: "runtime.startup", token = token.as_str(), "applying startup token");
        match interp.evaluate(&call) {
            EvalOutcome::Completed => {}
            other => error!(target: "runtime.startup", token = token.as_str(), ?other, "startup token did not complete cleanly"),
        }
    }
}

fn run_repl(interp: &mut Interpreter) {
    loop {
        let syntax = interp.mode.syntax_char;
        let seed = format!("{syntax}(ps,{syntax}(rs))");
        let _ = interp.terminal_mut().write("\n> ");
        match interp.evaluate(&seed) {
            EvalOutcome::Completed => {}
            EvalOutcome::UnbalancedParens(remainder) => {
                let _ = interp
                    .terminal_mut()
                    .write(&format!("<UNF> unbalanced parens: after parsing, remainder = {remainder}"));
            }
            EvalOutcome::Error(message) => {
                let _ = interp.terminal_mut().write(&message);
            }
            EvalOutcome::Interrupted => {
                let _ = interp.terminal_mut().write("<INT>");
            }
            EvalOutcome::ScanOverflow => {
                let _ = interp.terminal_mut().write("<SCE>");
            }
            EvalOutcome::Halted => {
                info!(target: "runtime", "halt");
                break;
            }
        }
    }
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let terminal = build_terminal(&args.console)?;
    let mut interp = Interpreter::new(terminal);

    let cfg = config::load_from(args.config.clone())?;
    cfg.apply(&mut interp.mode)?;

    apply_startup_tokens(&mut interp, &args.startup);
    run_repl(&mut interp);
    Ok(())
}
