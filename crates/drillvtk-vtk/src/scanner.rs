//! Whitespace-delimited token scanner for legacy VTK text.
//!
//! Legacy files may put one value per line or pack many per line; the reader
//! only ever sees a flat token stream. Lines starting with `#` are comments.

/// A token with the line it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text.
    pub text: &'a str,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Token<'_> {
    /// Case-insensitive keyword comparison.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Scanner over legacy VTK text.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    /// Current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Discard everything up to and including the next newline.
    pub fn skip_line(&mut self) {
        let bytes = self.input.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                return;
            }
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace_and_comments();

        let bytes = self.input.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        // ASCII whitespace never falls inside a multi-byte sequence, so both
        // ends are char boundaries.
        Some(Token {
            text: &self.input[start..self.pos],
            line: self.line,
        })
    }

    fn skip_whitespace_and_comments(&mut self) {
        let bytes = self.input.as_bytes();
        let mut at_line_start = self.pos == 0 || bytes.get(self.pos - 1) == Some(&b'\n');
        while let Some(&b) = bytes.get(self.pos) {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    at_line_start = true;
                }
                b'#' if at_line_start => self.skip_line(),
                _ if b.is_ascii_whitespace() => self.pos += 1,
                _ => return,
            }
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
