//! Form / Chunk model: chunked mutable strings carrying a single movable
//! form pointer (cursor).
//!
//! A [`Form`] is a named, ordered sequence of [`Chunk`]s — literal `Text`
//! runs, numbered `Gap`s left behind by a prior `SS` segmentation, and a
//! single terminating `End` — plus a `cursor` identifying which chunk holds
//! the form pointer. Unlike the chunk-local pointer fields of the system
//! this module is descended from, the pointer lives once, on the `Form`
//! (`cursor` + an intra-`Text` offset); chunks never disagree about where
//! it is.
//!
//! Text is stored as `Vec<char>` rather than `String` because every
//! operation here addresses individual Unicode scalar values (spec: "treat
//! Unicode as opaque scalar codepoints") and needs O(1) positional access,
//! which byte-indexed `String`s do not give for non-ASCII content.

pub mod numeric;

use std::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a [`Form`]'s content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chunk {
    /// A literal run of characters. `offset` is `Some(i)` (`0 <= i <
    /// text.len()`) when the form pointer sits inside this chunk, `None`
    /// otherwise. Invariant: `text` is never empty.
    Text { text: Vec<char>, offset: Option<usize> },
    /// A 1-based-when-displayed, 0-based-internally segment gap bound to
    /// argument `n` of a subsequent `CL`. `present` mirrors `offset.is_some()`
    /// for the text case: whether the form pointer sits at this chunk.
    Gap { n: usize, present: bool },
    /// The terminating sentinel; exactly one per form, always last.
    End { present: bool },
}

impl Chunk {
    fn char_avail(&self) -> bool {
        matches!(self, Chunk::Text { .. })
    }

    fn is_end(&self) -> bool {
        matches!(self, Chunk::End { .. })
    }

    fn enter(&mut self) {
        match self {
            Chunk::Text { offset, .. } => *offset = Some(0),
            Chunk::Gap { present, .. } => *present = true,
            Chunk::End { present } => *present = true,
        }
    }

    fn exit(&mut self) {
        match self {
            Chunk::Text { offset, .. } => *offset = None,
            Chunk::Gap { present, .. } => *present = false,
            Chunk::End { present } => *present = false,
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Text { text, offset } => match offset {
                None => write!(f, "{}", text.iter().collect::<String>()),
                Some(o) => write!(
                    f,
                    "{}<^>{}",
                    text[..*o].iter().collect::<String>(),
                    text[*o..].iter().collect::<String>()
                ),
            },
            Chunk::Gap { n, present } => {
                if *present {
                    write!(f, "<^>")?;
                }
                write!(f, "<{}>", n + 1)
            }
            Chunk::End { present } => {
                if *present {
                    write!(f, "<^>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A named, mutable, pointer-carrying defined string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    name: String,
    chunks: Vec<Chunk>,
    cursor: usize,
}

impl Form {
    /// Create a form named `name` with initial content `text`, pointer at
    /// the left edge.
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let chunks = if chars.is_empty() {
            vec![Chunk::End { present: true }]
        } else {
            vec![
                Chunk::Text { text: chars, offset: Some(0) },
                Chunk::End { present: false },
            ]
        };
        Form { name: name.into(), chunks, cursor: 0 }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.chunks[self.cursor].is_end()
    }

    /// True iff the form pointer sits at the very left edge of the form
    /// (chunk 0, offset 0 for text; chunk 0 for gap/end).
    pub fn is_at_left(&self) -> bool {
        if self.cursor != 0 {
            return false;
        }
        match &self.chunks[0] {
            Chunk::Text { offset, .. } => *offset == Some(0),
            _ => true,
        }
    }

    fn enter_chunk(&mut self) {
        self.chunks[self.cursor].enter();
    }

    fn exit_chunk(&mut self) {
        self.chunks[self.cursor].exit();
    }

    /// `CR`: move the pointer to the leftmost chunk.
    pub fn reset_pointer(&mut self) {
        self.exit_chunk();
        self.cursor = 0;
        self.enter_chunk();
    }

    /// Advance until a character is available or the end is reached.
    /// Returns true if no character is available (end reached).
    fn to_next_char(&mut self) -> bool {
        while !(self.at_end() || self.chunks[self.cursor].char_avail()) {
            self.exit_chunk();
            self.cursor += 1;
            self.enter_chunk();
        }
        self.at_end()
    }

    /// Only valid after `to_next_char` returned false.
    fn get_next_char(&mut self) -> char {
        let (ch, advance) = match &mut self.chunks[self.cursor] {
            Chunk::Text { text, offset } => {
                let o = offset.expect("active text chunk");
                let ch = text[o];
                if o + 1 == text.len() {
                    *offset = None;
                    (ch, true)
                } else {
                    *offset = Some(o + 1);
                    (ch, false)
                }
            }
            _ => unreachable!("get_next_char requires an active text chunk"),
        };
        if advance {
            self.cursor += 1;
            self.enter_chunk();
        }
        ch
    }

    /// Returns true if there is no previous character.
    fn to_prev_char(&mut self) -> bool {
        if let Chunk::Text { offset: Some(o), .. } = &self.chunks[self.cursor] {
            if *o > 0 {
                return false;
            }
        }
        loop {
            if self.cursor == 0 {
                return true;
            }
            if self.chunks[self.cursor - 1].char_avail() {
                return false;
            }
            self.exit_chunk();
            self.cursor -= 1;
            self.enter_chunk();
        }
    }

    /// Only valid after `to_prev_char` returned false.
    fn get_prev_char(&mut self) -> char {
        if let Chunk::Text { text, offset } = &mut self.chunks[self.cursor] {
            if let Some(o) = offset {
                if *o > 0 {
                    *o -= 1;
                    return text[*o];
                }
            }
        }
        self.exit_chunk();
        self.cursor -= 1;
        self.enter_chunk();
        match &mut self.chunks[self.cursor] {
            Chunk::Text { text, offset } => {
                let last = text.len() - 1;
                *offset = Some(last);
                text[last]
            }
            _ => unreachable!("to_prev_char guarantees a preceding text chunk"),
        }
    }

    /// `CC`: read one character and advance. `None` means the pointer was
    /// already at the end (caller supplies the default, actively).
    pub fn call_character(&mut self) -> Option<char> {
        if self.to_next_char() {
            return None;
        }
        Some(self.get_next_char())
    }

    /// `CN`: read `value` characters in the direction given by `is_minus`
    /// (the literal sign character parsed from the call, so `-0` still
    /// selects the leftward branch). `None` means the caller hit the
    /// relevant boundary with nothing collected yet (default, actively).
    pub fn call_n(&mut self, value: i64, is_minus: bool) -> Option<String> {
        if !is_minus {
            if self.at_end() {
                return None;
            }
            if value == 0 {
                self.to_next_char();
                return Some(String::new());
            }
            let mut out = String::new();
            let mut remaining = value;
            while remaining > 0 {
                if self.to_next_char() {
                    return Some(out);
                }
                out.push(self.get_next_char());
                remaining -= 1;
            }
            Some(out)
        } else {
            if self.is_at_left() {
                return None;
            }
            if value == 0 {
                self.to_prev_char();
                return Some(String::new());
            }
            let mut out = String::new();
            let mut remaining = value;
            while remaining < 0 {
                if self.to_prev_char() {
                    return Some(out);
                }
                out.insert(0, self.get_prev_char());
                remaining += 1;
            }
            Some(out)
        }
    }

    /// `CS`: remaining text of the current segment, advancing past the
    /// following gap. `None` at the end (default, actively).
    pub fn call_seg(&mut self) -> Option<String> {
        if self.at_end() {
            return None;
        }
        let (text, skip_next) = match &self.chunks[self.cursor] {
            Chunk::Text { text, offset } => {
                let o = offset.expect("active text chunk");
                (text[o..].iter().collect::<String>(), true)
            }
            Chunk::Gap { .. } => (String::new(), false),
            Chunk::End { .. } => unreachable!(),
        };
        self.exit_chunk();
        self.cursor += 1;
        if self.at_end() {
            self.enter_chunk();
            return Some(text);
        }
        if skip_next {
            self.cursor += 1;
        }
        self.enter_chunk();
        Some(text)
    }

    /// `IN`: find the leftmost occurrence of `needle` from the pointer to
    /// the end, returning the text traversed up to the match and advancing
    /// the pointer past it. `None` if not found (including an empty
    /// needle, which is never found) — default, actively.
    pub fn initial(&mut self, needle: &str) -> Option<String> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return None;
        }
        let start_cursor = self.cursor;
        let mut traversed = String::new();
        let mut found: Option<(usize, usize)> = None;
        for i in start_cursor..self.chunks.len() {
            if let Chunk::Text { text, offset } = &self.chunks[i] {
                let start = if i == start_cursor { offset.unwrap_or(0) } else { 0 };
                match find_subslice(&text[start..], &needle) {
                    Some(pos) => {
                        found = Some((i, start + pos));
                        break;
                    }
                    None => traversed.push_str(&text[start..].iter().collect::<String>()),
                }
            }
        }
        let (chunk_idx, idx) = found?;
        self.exit_chunk();
        let new_offset = idx + needle.len();
        let chunk_len = match &self.chunks[chunk_idx] {
            Chunk::Text { text, .. } => text.len(),
            _ => unreachable!(),
        };
        if new_offset == chunk_len {
            self.cursor = chunk_idx + 1;
            self.enter_chunk();
        } else {
            self.cursor = chunk_idx;
            self.enter_chunk();
            if let Chunk::Text { offset, .. } = &mut self.chunks[self.cursor] {
                *offset = Some(new_offset);
            }
        }
        Some(traversed)
    }

    /// `CL`: concatenate from the pointer to the end, substituting `args[n]`
    /// (or empty, if missing) for each gap `n`. Does not move the pointer.
    pub fn val(&self, args: &[String]) -> String {
        let mut out = String::new();
        for chunk in &self.chunks[self.cursor..] {
            match chunk {
                Chunk::Text { text, offset } => {
                    let start = offset.unwrap_or(0);
                    out.extend(&text[start..]);
                }
                Chunk::Gap { n, .. } => {
                    if let Some(a) = args.get(*n) {
                        out.push_str(a);
                    }
                }
                Chunk::End { .. } => {}
            }
        }
        out
    }

    /// `SS`: split every `Text` chunk on each non-empty `sep` in turn,
    /// inserting a gap numbered by that separator's position in `seps`
    /// between pieces, then reset the pointer to the leftmost chunk.
    pub fn segment(&mut self, seps: &[String]) {
        self.exit_chunk();
        for (segno, sep) in seps.iter().enumerate() {
            if sep.is_empty() {
                continue;
            }
            let sep_chars: Vec<char> = sep.chars().collect();
            let mut rebuilt = Vec::with_capacity(self.chunks.len());
            for chunk in std::mem::take(&mut self.chunks) {
                match chunk {
                    Chunk::Text { text, .. } => {
                        rebuilt.extend(split_text_chunk(&text, segno, &sep_chars));
                    }
                    other => rebuilt.push(other),
                }
            }
            self.chunks = rebuilt;
        }
        self.cursor = 0;
        self.enter_chunk();
    }

    /// Checks the structural invariants, returning a description of each
    /// violation (diagnostic only — callers log, they do not abort).
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut active_count = 0usize;
        let mut end_count = 0usize;
        let mut prev_is_text = false;
        for chunk in &self.chunks {
            match chunk {
                Chunk::Text { text, offset } => {
                    if prev_is_text {
                        issues.push(format!("consecutive text chunks in '{}'", self.name));
                    }
                    prev_is_text = true;
                    if text.is_empty() {
                        issues.push(format!("empty text chunk in '{}'", self.name));
                    }
                    if let Some(o) = offset {
                        active_count += 1;
                        if *o >= text.len() {
                            issues.push(format!("pointer out of range in '{}'", self.name));
                        }
                    }
                }
                Chunk::Gap { present, .. } => {
                    prev_is_text = false;
                    if *present {
                        active_count += 1;
                    }
                }
                Chunk::End { present } => {
                    prev_is_text = false;
                    end_count += 1;
                    if *present {
                        active_count += 1;
                    }
                }
            }
        }
        if active_count != 1 {
            issues.push(format!("{active_count} active chunks in '{}'", self.name));
        }
        if end_count != 1 {
            issues.push(format!("end count ({end_count}) illegal in '{}'", self.name));
        }
        if !matches!(self.chunks.last(), Some(Chunk::End { .. })) {
            issues.push(format!("end chunk not at end of '{}'", self.name));
        }
        issues
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.chunks {
            write!(f, "{chunk}")?;
        }
        Ok(())
    }
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split_text_chunk(text: &[char], segno: usize, sep: &[char]) -> Vec<Chunk> {
    let mut pieces: Vec<&[char]> = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + sep.len() <= text.len() {
        if &text[i..i + sep.len()] == sep {
            pieces.push(&text[start..i]);
            i += sep.len();
            start = i;
        } else {
            i += 1;
        }
    }
    pieces.push(&text[start..]);
    let last = pieces.len() - 1;
    let mut out = Vec::new();
    for (idx, piece) in pieces.into_iter().enumerate() {
        if !piece.is_empty() {
            out.push(Chunk::Text { text: piece.to_vec(), offset: None });
        }
        if idx != last {
            out.push(Chunk::Gap { n: segno, present: false });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_empty_is_end_only() {
        let f = Form::new("x", "");
        assert!(f.at_end());
        assert!(f.is_at_left());
    }

    #[test]
    fn round_trip_ds_cl() {
        let f = Form::new("greeting", "hello");
        assert_eq!(f.val(&[]), "hello");
    }

    #[test]
    fn cc_exhausts_to_default() {
        let mut f = Form::new("x", "ab");
        assert_eq!(f.call_character(), Some('a'));
        assert_eq!(f.call_character(), Some('b'));
        assert_eq!(f.call_character(), None);
        assert_eq!(f.call_character(), None, "stays exhausted");
    }

    #[test]
    fn cn_direction_round_trip() {
        let mut f = Form::new("a", "hello");
        assert_eq!(f.call_n(2, false), Some("he".to_string()));
        assert_eq!(f.call_n(0, true), Some(String::new()), "negative zero just nudges");
        assert_eq!(f.call_n(10, false), Some("llo".to_string()));
        assert_eq!(f.call_n(1, false), None);
        // walk all the way back
        let mut f2 = Form::new("b", "hello");
        assert_eq!(f2.call_n(5, false), Some("hello".to_string()));
        assert_eq!(f2.call_n(-5, true), Some("hello".to_string()));
        assert!(f2.is_at_left());
    }

    #[test]
    fn segment_then_val_substitutes_gaps() {
        let mut f = Form::new("p", "abXcdXef");
        f.segment(&["X".to_string()]);
        assert!(f.is_at_left());
        assert_eq!(
            f.val(&["-".to_string(), "-".to_string()]),
            "ab-cd-ef"
        );
    }

    #[test]
    fn segment_is_idempotent() {
        let mut f = Form::new("p", "a,b,c");
        f.segment(&[",".to_string()]);
        let once = format!("{f}");
        f.segment(&[",".to_string()]);
        let twice = format!("{f}");
        assert_eq!(once, twice);
    }

    #[test]
    fn initial_advances_past_match() {
        let mut f = Form::new("s", "foo-bar-baz");
        f.segment(&["-".to_string()]);
        let before = f.initial("bar");
        assert_eq!(before, Some("foo".to_string()));
    }

    #[test]
    fn in_never_finds_empty_needle() {
        let mut f = Form::new("s", "abc");
        assert_eq!(f.initial(""), None);
    }

    #[test]
    fn validate_flags_nothing_on_fresh_form() {
        let f = Form::new("ok", "hi");
        assert!(f.validate().is_empty());
    }

    #[test]
    fn pf_renders_pointer_and_gaps() {
        let mut f = Form::new("p", "abXcd");
        f.segment(&["X".to_string()]);
        assert_eq!(format!("{f}"), "<^>ab<1>cd");
    }
}
