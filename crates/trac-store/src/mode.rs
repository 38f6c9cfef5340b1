//! Process-wide (but explicitly owned, not global) interpreter switches:
//! the syntax/meta characters, the extended/unforgiving toggles, the trace
//! flag, and the activeness of the most recent implied call.

/// The mode bank. Lives for the process inside an [`crate::Interpreter`]
/// (see `trac-eval`); `MO` resets or adjusts it in place.
#[derive(Debug, Clone)]
pub struct ModeState {
    pub syntax_char: char,
    pub meta_char: char,
    pub extended: bool,
    pub unforgiving: bool,
    pub trace: bool,
    /// Set at each implied (non-primitive) call to that call's activeness;
    /// read by `NI`.
    pub implied_active: bool,
    /// Every successfully-entered `RS` line, oldest first. The source
    /// declares the equivalent `rshistory` global at startup but never
    /// reads it back; kept here for the same reason — a recorded-but-
    /// unconsumed log of read-string input, not a recall mechanism.
    pub rs_history: Vec<String>,
}

impl Default for ModeState {
    fn default() -> Self {
        // The reference implementation starts with extended primitives
        // already enabled; `#(mo)` is what drops back to strict T-64.
        ModeState {
            syntax_char: '#',
            meta_char: '\'',
            extended: true,
            unforgiving: false,
            trace: false,
            implied_active: false,
            rs_history: Vec::new(),
        }
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#(mo)`: drop back to strict T-64 regulation mode.
    pub fn reset(&mut self) {
        self.extended = false;
        self.unforgiving = false;
    }

    /// `#(mo,e,switches)`: apply a run of optionally `+`/`-`-prefixed
    /// single-letter switches (`p` extended primitives, `u` unforgiving).
    /// A missing sign defaults to `+`. An empty `switches` is a no-op.
    pub fn apply_switches(&mut self, switches: &str) -> Result<(), String> {
        let chars: Vec<char> = switches.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let mut enable = true;
            if chars[i] == '+' {
                i += 1;
            } else if chars[i] == '-' {
                enable = false;
                i += 1;
            }
            if i >= chars.len() {
                return Err("missing switch".to_string());
            }
            match chars[i] {
                'p' => self.extended = enable,
                'u' => self.unforgiving = enable,
                other => return Err(format!("unrecognized switch: {other}")),
            }
            i += 1;
        }
        Ok(())
    }

    /// `#(mo,ms,c)`: change the syntax character.
    pub fn set_syntax_char(&mut self, candidate: &str) -> Result<(), String> {
        self.syntax_char = validate_special_char(candidate, self.meta_char)?;
        Ok(())
    }

    /// `#(cm,c)`: change the meta character.
    pub fn set_meta_char(&mut self, candidate: &str) -> Result<(), String> {
        self.meta_char = validate_special_char(candidate, self.syntax_char)?;
        Ok(())
    }

    /// Human-readable current switch bank, for `#(mo,pm)`.
    pub fn describe(&self) -> String {
        format!(
            "<MO>: {}extended primitives; {}forgiving with errors.",
            if self.extended { "" } else { "no " },
            if self.unforgiving { "un" } else { "" }
        )
    }

}

fn validate_special_char(candidate: &str, exclude: char) -> Result<char, String> {
    let ch = candidate
        .chars()
        .next()
        .ok_or_else(|| "cannot change to null string".to_string())?;
    if ch == '(' || ch == ')' || ch == exclude {
        return Err(format!("cannot change to '{ch}'"));
    }
    let code = ch as u32;
    if (code < 32 && ch != '\n') || code > 126 {
        return Err("cannot change to non-printing character".to_string());
    }
    Ok(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_disables_extensions() {
        let mut m = ModeState::new();
        m.unforgiving = true;
        m.reset();
        assert!(!m.extended);
        assert!(!m.unforgiving);
    }

    #[test]
    fn switches_default_to_enable() {
        let mut m = ModeState::new();
        m.reset();
        m.apply_switches("p-u").unwrap();
        assert!(m.extended);
        assert!(!m.unforgiving);
    }

    #[test]
    fn switches_reject_unknown_letter() {
        let mut m = ModeState::new();
        assert!(m.apply_switches("+z").is_err());
    }

    #[test]
    fn switches_reject_trailing_sign() {
        let mut m = ModeState::new();
        assert!(m.apply_switches("p+").is_err());
    }

    #[test]
    fn syntax_char_rejects_parens_and_meta() {
        let mut m = ModeState::new();
        assert!(m.set_syntax_char("(").is_err());
        assert!(m.set_syntax_char("'").is_err());
        assert!(m.set_syntax_char(":").is_ok());
        assert_eq!(m.syntax_char, ':');
    }

    #[test]
    fn meta_char_rejects_non_printing() {
        let mut m = ModeState::new();
        assert!(m.set_meta_char("\u{1}").is_err());
        assert!(m.set_meta_char("\n").is_ok());
    }
}
