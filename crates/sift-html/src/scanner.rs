//! A cursor over an immutable text buffer.
//!
//! The scanner knows nothing about markup. Character classes are given as
//! slices of characters, so callers can build them from configured bracket
//! characters at runtime.

/// Whitespace as understood by the markup and selector lexers.
pub const SPACE: &[char] = &[' ', '\n', '\t'];

/// Result of reading up to a terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadUntil<T> {
    /// Text before the terminator, or the rest of the input when the
    /// terminator was not found.
    pub text: T,
    /// Whether the terminator was found.
    pub found: bool,
}

/// Byte-offset cursor over a `&str`.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to a byte offset previously obtained from
    /// [`Scanner::position`], clamped to the input length.
    pub fn set_position(&mut self, pos: usize) {
        let mut pos = pos.min(self.input.len());
        while !self.input.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
    }

    /// The whole input.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Unconsumed input.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Input between two byte offsets.
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.input[from.min(to)..to.min(self.input.len())]
    }

    /// Whether the cursor is past the last character.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Character under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `offset` characters after the cursor.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    /// Move forward one character and return the new current character.
    pub fn advance(&mut self) -> Option<char> {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
        self.current()
    }

    /// Move forward `n` characters and return the new current character.
    pub fn advance_by(&mut self, n: usize) -> Option<char> {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
        self.current()
    }

    /// Whether `literal` appears `offset` characters after the cursor.
    #[must_use]
    pub fn lookahead_is(&self, offset: usize, literal: &str, ignore_case: bool) -> bool {
        let mut chars = self.rest().chars().skip(offset);
        literal.chars().all(|expected| {
            chars.next().is_some_and(|c| {
                if ignore_case {
                    c.eq_ignore_ascii_case(&expected)
                } else {
                    c == expected
                }
            })
        })
    }

    /// Consume a maximal run of characters from `class`.
    pub fn skip(&mut self, class: &[char]) {
        let _ = self.read_while(class);
    }

    /// Consume and return a maximal run of characters from `class`.
    pub fn read_while(&mut self, class: &[char]) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !class.contains(&c))
            .unwrap_or_else(|| self.rest().len());
        self.pos += len;
        &self.input[start..self.pos]
    }

    /// Consume and return a maximal run of characters not in `class`.
    pub fn read_until(&mut self, class: &[char]) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| class.contains(&c))
            .unwrap_or_else(|| self.rest().len());
        self.pos += len;
        &self.input[start..self.pos]
    }

    /// Read up to the next occurrence of `literal`, leaving the cursor on
    /// it.
    ///
    /// When the literal is missing the rest of the input is consumed and
    /// returned, unless `keep_if_missing` is set, in which case nothing is
    /// consumed and the text is empty.
    pub fn read_until_literal(
        &mut self,
        literal: &str,
        keep_if_missing: bool,
    ) -> ReadUntil<&'a str> {
        if self.is_at_end() {
            return ReadUntil { text: "", found: false };
        }
        let start = self.pos;
        match self.rest().find(literal) {
            Some(offset) => {
                self.pos += offset;
                ReadUntil {
                    text: &self.input[start..self.pos],
                    found: true,
                }
            }
            None if keep_if_missing => ReadUntil { text: "", found: false },
            None => {
                self.pos = self.input.len();
                ReadUntil {
                    text: &self.input[start..],
                    found: false,
                }
            }
        }
    }

    /// Read up to the next `terminator` not preceded by a backslash and
    /// consume the terminator. Escaped terminators lose their backslash.
    ///
    /// When no unescaped terminator exists the rest of the input is
    /// consumed and returned as-is.
    pub fn read_until_unescaped(&mut self, terminator: char) -> ReadUntil<String> {
        let start = self.pos;
        let rest = self.rest();
        let mut search_from = 0;
        let mut escaped = false;
        while let Some(offset) = rest[search_from..].find(terminator) {
            let at = search_from + offset;
            if at > 0 && rest[..at].ends_with('\\') {
                escaped = true;
                search_from = at + terminator.len_utf8();
                continue;
            }
            self.pos = start + at + terminator.len_utf8();
            let raw = &rest[..at];
            let text = if escaped {
                raw.replace(&format!("\\{terminator}"), &terminator.to_string())
            } else {
                raw.to_string()
            };
            return ReadUntil { text, found: true };
        }
        self.pos = self.input.len();
        ReadUntil {
            text: rest.to_string(),
            found: false,
        }
    }
}
