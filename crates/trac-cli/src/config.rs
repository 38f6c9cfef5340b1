//! Optional `trac.toml` startup configuration, mirroring the teacher's
//! `core-config::load_from`: unknown fields ignored, a missing file (or
//! one that was never requested) falls back to defaults untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TracConfig {
    pub syntax_char: Option<char>,
    pub meta_char: Option<char>,
    pub extended: Option<bool>,
    pub unforgiving: Option<bool>,
}

/// Loads `path` if given, else `./trac.toml` if it exists, else defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<TracConfig> {
    let candidate = path.or_else(|| {
        let default = Path::new("trac.toml");
        default.exists().then(|| default.to_path_buf())
    });
    let Some(candidate) = candidate else {
        return Ok(TracConfig::default());
    };
    let text = std::fs::read_to_string(&candidate)
        .with_context(|| format!("reading {}", candidate.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", candidate.display()))
}

impl TracConfig {
    /// Apply the loaded values onto a fresh `ModeState`, as if each had
    /// been set via `#(mo,...)`/`#(cm,...)` at startup.
    pub fn apply(&self, mode: &mut trac_store::ModeState) -> Result<()> {
        if let Some(c) = self.extended {
            mode.extended = c;
        }
        if let Some(u) = self.unforgiving {
            mode.unforgiving = u;
        }
        if let Some(s) = self.syntax_char {
            mode.set_syntax_char(&s.to_string())
                .map_err(anyhow::Error::msg)
                .context("trac.toml syntax_char")?;
        }
        if let Some(m) = self.meta_char {
            mode.set_meta_char(&m.to_string())
                .map_err(anyhow::Error::msg)
                .context("trac.toml meta_char")?;
        }
        Ok(())
    }
}
