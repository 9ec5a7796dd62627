//! Character stream with one-character lookahead
//!
//! The conversion scans its input through this cursor and nothing else. Input
//! is held as a list of lines regardless of how the caller supplied it; the
//! stream hands out the characters of each line and a single `'\n'` between
//! consecutive lines, so line-ending style never reaches the scanner. End of
//! input is one sentinel: `None`, returned stably once the last line runs out.
//!
//! At most one character is ever buffered: `peek` memoizes the next character
//! and `unget` plants an arbitrary one, which the following `get` or `peek`
//! consumes before the line buffer is touched again.

/// Cursor over the source lines.
pub struct CharStream {
    lines: Vec<String>,
    line_nr: usize,
    col: usize,
    lookahead: Option<char>,
}

impl CharStream {
    /// Build a stream from a single block of text, splitting it into lines.
    ///
    /// `\n`, `\r\n`, and `\r` all count as line breaks. A trailing break
    /// produces a final empty line, which is what preserves it on output.
    pub fn from_text(text: &str) -> Self {
        CharStream::from_lines(split_lines(text))
    }

    /// Build a stream from already-split lines. The lines must not contain
    /// line-break characters of their own.
    pub fn from_lines(lines: Vec<String>) -> Self {
        CharStream {
            lines,
            line_nr: 0,
            col: 0,
            lookahead: None,
        }
    }

    /// The 1-based line number of the next character to be read.
    pub fn line_number(&self) -> usize {
        self.line_nr + 1
    }

    /// Consume and return the next character, or `None` at end of input.
    pub fn get(&mut self) -> Option<char> {
        if let Some(c) = self.lookahead.take() {
            return Some(c);
        }
        self.advance()
    }

    /// Return the next character without consuming it.
    ///
    /// The character is memoized in the lookahead slot, so the following
    /// `get` returns exactly it without re-reading the line buffer.
    pub fn peek(&mut self) -> Option<char> {
        if self.lookahead.is_none() {
            self.lookahead = self.advance();
        }
        self.lookahead
    }

    /// Push a character back into the lookahead slot.
    ///
    /// Used when the scanner reads one character too many while testing for a
    /// boundary. The slot holds a single character; ungetting while one is
    /// already buffered would lose it, so callers never do.
    pub fn unget(&mut self, c: char) {
        debug_assert!(self.lookahead.is_none());
        self.lookahead = Some(c);
    }

    fn advance(&mut self) -> Option<char> {
        let line = self.lines.get(self.line_nr)?;
        match line[self.col..].chars().next() {
            Some(c) => {
                self.col += c.len_utf8();
                Some(c)
            }
            None if self.line_nr + 1 < self.lines.len() => {
                self.line_nr += 1;
                self.col = 0;
                Some('\n')
            }
            None => None,
        }
    }
}

/// Split a block of text into lines on `\n`, `\r\n`, or `\r`.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    lines.push(current);
    lines
}
