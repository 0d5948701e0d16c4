//! Quote-aware tokenizer for the value list of a single `VALUES (...)` group.
//!
//! The tokenizer is a two-state machine (outside / inside a string literal)
//! that splits the list on top-level commas. Commas and parentheses inside
//! string literals are ordinary characters, and so are commas nested inside
//! parentheses (`CAST(x AS decimal(18, 2))`, `DATEADD(day, 1, x)`).
//! Outside string literals, `--` and `/* */` comments count as whitespace,
//! matching the lexer that captured the list.

use alloc::string::String;
use alloc::vec::Vec;

/// How a single quote is escaped inside a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteEscape {
    /// `''` stands for one quote, as in T-SQL scripts.
    #[default]
    Doubled,
    /// `\'` stands for one quote, and `\` escapes any following character.
    Backslash,
}

/// A single literal as it appeared in the value list, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// The literal text.
    pub text: String,
    /// Byte offset of the literal within the tokenized list.
    pub pos: usize,
}

impl RawToken {
    /// Returns the literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Errors produced while tokenizing a value list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// A string literal is still open at the end of the list.
    ///
    /// Lists captured by the [`Scanner`](crate::Scanner) never end inside a
    /// string: the scanner reports those as [`ScanError::Lexer`](crate::ScanError::Lexer).
    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString {
        /// Position of the opening quote.
        pos: usize,
    },
    /// Two separators with nothing between them.
    #[error("Empty value at position {pos}")]
    EmptyValue {
        /// Position of the separator closing the empty value.
        pos: usize,
    },
}

impl TokenizeError {
    /// Byte offset the error points at, relative to the tokenized list.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Self::UnterminatedString { pos } | Self::EmptyValue { pos } => *pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside { start: usize },
}

/// Splits value lists into [`RawToken`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTokenizer {
    escape: QuoteEscape,
}

impl ValueTokenizer {
    /// Create a tokenizer using the given escape convention.
    #[must_use]
    pub fn new(escape: QuoteEscape) -> Self {
        Self { escape }
    }

    /// Tokenize the text between the parentheses of one value group.
    ///
    /// # Errors
    ///
    /// * `UnterminatedString` - If a string literal is not closed before the end of `list`.
    /// * `EmptyValue` - If two commas have nothing but whitespace between them.
    pub fn tokenize(&self, list: &str) -> Result<Vec<RawToken>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut acc = Accumulator::default();
        let mut state = State::Outside;
        let mut depth = 0usize;
        let mut escaped = false;
        let mut chars = list.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match state {
                State::Inside { .. } if escaped => escaped = false,
                State::Inside { .. } => match (c, self.escape) {
                    ('\\', QuoteEscape::Backslash) => escaped = true,
                    ('\'', QuoteEscape::Doubled) if chars.peek().is_some_and(|&(_, n)| n == '\'') => {
                        acc.push(i, c);
                        chars.next();
                        acc.push(i + 1, '\'');
                        continue;
                    }
                    ('\'', _) => state = State::Outside,
                    _ => {}
                },
                State::Outside => match c {
                    '\'' => state = State::Inside { start: i },
                    '-' if chars.peek().is_some_and(|&(_, n)| n == '-') => {
                        while chars.next_if(|&(_, n)| n != '\n').is_some() {}
                        acc.push(i, ' ');
                        continue;
                    }
                    '/' if chars.peek().is_some_and(|&(_, n)| n == '*') => {
                        chars.next();
                        let mut star = false;
                        for (_, n) in chars.by_ref() {
                            if star && n == '/' {
                                break;
                            }
                            star = n == '*';
                        }
                        acc.push(i, ' ');
                        continue;
                    }
                    '(' => depth += 1,
                    ')' => depth = depth.saturating_sub(1),
                    ',' if depth == 0 => {
                        let token = acc.take().ok_or(TokenizeError::EmptyValue { pos: i })?;
                        tokens.push(token);
                        continue;
                    }
                    _ => {}
                },
            }
            acc.push(i, c);
        }

        if let State::Inside { start } = state {
            return Err(TokenizeError::UnterminatedString { pos: start });
        }
        if let Some(token) = acc.take() {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Collects the characters of the current token.
#[derive(Default)]
struct Accumulator {
    text: String,
    start: Option<usize>,
}

impl Accumulator {
    fn push(&mut self, pos: usize, c: char) {
        if self.start.is_none() && c.is_whitespace() {
            return;
        }
        self.start.get_or_insert(pos);
        self.text.push(c);
    }

    /// Returns the trimmed token, or `None` if nothing but whitespace was seen.
    fn take(&mut self) -> Option<RawToken> {
        let pos = self.start.take()?;
        let text = core::mem::take(&mut self.text);
        Some(RawToken {
            text: text.trim_end().into(),
            pos,
        })
    }
}
