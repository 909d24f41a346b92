#![forbid(unsafe_code)]

//! Project-format and generated-code streams.
//!
//! The project format is a brace-delimited word stream:
//!
//! ```text
//! grid {
//!   name {main_grid}
//!   xywh {10 10 320 240}
//!   dimensions {3 3}
//!   rowweights {0 50 0}
//!   button {
//!     xywh {0 0 20 20}
//!     parent_properties {
//!       location {0 2}
//!       colspan 2
//!     }
//!   }
//! }
//! ```
//!
//! [`ProjectReader::read_word`] is group-aware: a `{...}` value is
//! returned as one word containing its inner text, which is how
//! multi-number values like `xywh {10 10 320 240}` are consumed in one
//! step. Array blocks (`rowweights { ... }`) are instead walked with
//! [`ProjectReader::read_word_brace`] and [`ProjectReader::read_int`]
//! so their length can follow the current dimension count.

// ---------------------------------------------------------------------------
// ProjectReader
// ---------------------------------------------------------------------------

/// Tokenized reader over the brace-delimited project text.
#[derive(Debug)]
pub struct ProjectReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> ProjectReader<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    #[must_use]
    pub fn eof(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.src.len()
    }

    /// Next word. A `{...}` group is returned as one word holding the
    /// inner text (nested braces balanced); a lone `}` is the token `}`.
    /// `None` at end of input.
    pub fn read_word(&mut self) -> Option<String> {
        self.skip_ws();
        if self.pos >= self.src.len() {
            return None;
        }
        match self.src[self.pos] {
            b'{' => {
                self.pos += 1;
                let start = self.pos;
                let mut depth = 1usize;
                while self.pos < self.src.len() {
                    match self.src[self.pos] {
                        b'{' => depth += 1,
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    self.pos += 1;
                }
                let inner = &self.src[start..self.pos.min(self.src.len())];
                if self.pos < self.src.len() {
                    self.pos += 1; // closing brace
                }
                Some(String::from_utf8_lossy(inner).trim().to_string())
            }
            b'}' => {
                self.pos += 1;
                Some("}".to_string())
            }
            _ => Some(self.read_plain()),
        }
    }

    /// Next raw token; `{` and `}` are single-character tokens rather
    /// than group delimiters. Used to walk array blocks.
    pub fn read_word_brace(&mut self) -> Option<String> {
        self.skip_ws();
        if self.pos >= self.src.len() {
            return None;
        }
        match self.src[self.pos] {
            b @ (b'{' | b'}') => {
                self.pos += 1;
                Some((b as char).to_string())
            }
            _ => Some(self.read_plain()),
        }
    }

    fn read_plain(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_whitespace() || b == b'{' || b == b'}' {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    /// Next raw token parsed as an integer; 0 when the token is missing
    /// or malformed (the arrays' default-compatible fallback).
    pub fn read_int(&mut self) -> i32 {
        self.read_word_brace()
            .and_then(|w| w.parse().ok())
            .unwrap_or(0)
    }
}

/// Parse the first `N` whitespace-separated integers of a group value.
/// `None` unless all `N` are present and well-formed, mirroring a full
/// `sscanf` match; callers leave prior state untouched on `None`.
#[must_use]
pub fn scan_ints<const N: usize>(value: &str) -> Option<[i32; N]> {
    let mut out = [0i32; N];
    let mut it = value.split_whitespace();
    for slot in &mut out {
        *slot = it.next()?.parse().ok()?;
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// ProjectWriter
// ---------------------------------------------------------------------------

/// Emits the project text, one indented line per `write_indent`, words
/// space-separated within a line.
#[derive(Debug, Default)]
pub struct ProjectWriter {
    out: String,
}

impl ProjectWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new line at the given indent level.
    pub fn write_indent(&mut self, level: usize) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }

    /// Append one word to the current line. A separating space is
    /// inserted unless the line is empty, the previous word ended with
    /// `{`, or this word closes a block.
    pub fn write_string(&mut self, word: impl AsRef<str>) {
        let word = word.as_ref();
        let last = self.out.chars().last();
        let at_line_start = matches!(last, None | Some('\n' | ' ')) && self.line_is_blank();
        if !at_line_start && last != Some('{') && !word.starts_with('}') {
            self.out.push(' ');
        }
        self.out.push_str(word);
    }

    fn line_is_blank(&self) -> bool {
        self.out
            .rsplit('\n')
            .next()
            .is_none_or(|line| line.chars().all(|c| c == ' '))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[must_use]
    pub fn finish(mut self) -> String {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

// ---------------------------------------------------------------------------
// CodeWriter
// ---------------------------------------------------------------------------

/// Emits generated source, one statement per `write_c` call, with block
/// indentation managed by `push_indent`/`pop_indent`.
#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    level: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one line at the current indent.
    pub fn write_c(&mut self, line: impl AsRef<str>) {
        for _ in 0..self.level {
            self.out.push_str("    ");
        }
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    pub fn push_indent(&mut self) {
        self.level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_returns_groups_as_single_words() {
        let mut r = ProjectReader::new("dimensions {3 4} gap {2 2}");
        assert_eq!(r.read_word().as_deref(), Some("dimensions"));
        assert_eq!(r.read_word().as_deref(), Some("3 4"));
        assert_eq!(r.read_word().as_deref(), Some("gap"));
        assert_eq!(r.read_word().as_deref(), Some("2 2"));
        assert!(r.eof());
    }

    #[test]
    fn reader_balances_nested_groups() {
        let mut r = ProjectReader::new("outer {a {b c} d} tail");
        assert_eq!(r.read_word().as_deref(), Some("outer"));
        assert_eq!(r.read_word().as_deref(), Some("a {b c} d"));
        assert_eq!(r.read_word().as_deref(), Some("tail"));
    }

    #[test]
    fn reader_close_brace_is_a_token() {
        let mut r = ProjectReader::new("} rest");
        assert_eq!(r.read_word().as_deref(), Some("}"));
        assert_eq!(r.read_word().as_deref(), Some("rest"));
    }

    #[test]
    fn brace_mode_walks_arrays() {
        let mut r = ProjectReader::new("rowweights {0 50 0}");
        assert_eq!(r.read_word().as_deref(), Some("rowweights"));
        assert_eq!(r.read_word_brace().as_deref(), Some("{"));
        assert_eq!(r.read_int(), 0);
        assert_eq!(r.read_int(), 50);
        assert_eq!(r.read_int(), 0);
        assert_eq!(r.read_word_brace().as_deref(), Some("}"));
    }

    #[test]
    fn read_int_tolerates_garbage() {
        let mut r = ProjectReader::new("12 oops -3");
        assert_eq!(r.read_int(), 12);
        assert_eq!(r.read_int(), 0);
        assert_eq!(r.read_int(), -3);
    }

    #[test]
    fn scan_ints_requires_full_match() {
        assert_eq!(scan_ints::<2>("3 4"), Some([3, 4]));
        assert_eq!(scan_ints::<2>("3 4 5"), Some([3, 4]));
        assert_eq!(scan_ints::<4>("1 2 3"), None);
        assert_eq!(scan_ints::<2>("3 x"), None);
    }

    #[test]
    fn writer_spacing_rules() {
        let mut w = ProjectWriter::new();
        w.write_indent(1);
        w.write_string("rowheights {");
        w.write_string("0");
        w.write_string("40");
        w.write_string("0");
        w.write_string("}");
        assert_eq!(w.as_str(), "  rowheights {0 40 0}");
    }

    #[test]
    fn writer_words_on_one_line() {
        let mut w = ProjectWriter::new();
        w.write_indent(0);
        w.write_string("dimensions {3 3}");
        w.write_string("gap {2 2}");
        w.write_indent(0);
        w.write_string("}");
        assert_eq!(w.finish(), "dimensions {3 3} gap {2 2}\n}\n");
    }

    #[test]
    fn code_writer_indents_blocks() {
        let mut c = CodeWriter::new();
        c.write_c("if let Some(cell) = grid.widget(w, 0, 0, 1, 1, Align::FILL) {");
        c.push_indent();
        c.write_c("cell.set_minimum_size(50, 20);");
        c.pop_indent();
        c.write_c("}");
        assert_eq!(
            c.finish(),
            "if let Some(cell) = grid.widget(w, 0, 0, 1, 1, Align::FILL) {\n    cell.set_minimum_size(50, 20);\n}\n"
        );
    }
}
