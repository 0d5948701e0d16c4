//! Lexer for the `INSERT` subset of T-SQL scripts.
//!
//! The lexer only distinguishes what the statement scanner needs: the three
//! keywords of an `INSERT` clause, identifiers (bare, `[bracketed]` or
//! `"quoted"`), string literals and punctuation. Everything else is an
//! [`TokenKind::Other`] token so that unrelated statements can be skipped.

use alloc::string::String;

use crate::tokenizer::QuoteEscape;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte offset where this token starts.
    pub pos: usize,
    /// Byte offset one past the end of this token.
    pub end: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// INSERT keyword
    Insert,
    /// INTO keyword
    Into,
    /// VALUES keyword
    Values,
    /// An identifier with its delimiters removed.
    Identifier(String),
    /// A string literal, `'...'` or `N'...'`.
    StringLiteral,
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Semicolon
    Semicolon,
    /// Any other character run (numbers, operators, unsupported syntax).
    Other,
    /// End of input
    Eof,
}

/// Lexer over a SQL script.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    escape: QuoteEscape,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str, escape: QuoteEscape) -> Self {
        Self {
            input,
            pos: 0,
            escape,
            peeked: None,
        }
    }

    /// Returns the input being lexed.
    #[must_use]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, LexerError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Result<Token, LexerError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.next_token()
    }

    /// Skip whitespace and comments.
    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'-' && self.pos + 1 < bytes.len() && bytes[self.pos + 1] == b'-' {
                // Line comment
                self.pos += 2;
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if b == b'/' && self.pos + 1 < bytes.len() && bytes[self.pos + 1] == b'*' {
                // Block comment
                self.pos += 2;
                while self.pos + 1 < bytes.len()
                    && !(bytes[self.pos] == b'*' && bytes[self.pos + 1] == b'/')
                {
                    self.pos += 1;
                }
                self.pos = (self.pos + 2).min(bytes.len());
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();

        let start_pos = self.pos;
        let bytes = self.input.as_bytes();

        if self.pos >= bytes.len() {
            return Ok(self.token(TokenKind::Eof, start_pos));
        }

        let b = bytes[self.pos];
        let kind = match b {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b';' => TokenKind::Semicolon,
            b'\'' => return self.read_string(start_pos),
            b'N' | b'n' if bytes.get(self.pos + 1) == Some(&b'\'') => {
                self.pos += 1;
                return self.read_string(start_pos);
            }
            b'[' => return self.read_delimited(start_pos, b']'),
            b'"' => return self.read_delimited(start_pos, b'"'),
            _ if is_ident_start(b) => return Ok(self.read_identifier(start_pos)),
            _ => return Ok(self.read_other(start_pos)),
        };

        self.pos += 1;
        Ok(self.token(kind, start_pos))
    }

    fn token(&self, kind: TokenKind, pos: usize) -> Token {
        Token {
            kind,
            pos,
            end: self.pos,
        }
    }

    /// Reads a string literal starting at the opening quote under `self.pos`.
    fn read_string(&mut self, start_pos: usize) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        self.pos += 1;

        while self.pos < bytes.len() {
            match (bytes[self.pos], self.escape) {
                (b'\\', QuoteEscape::Backslash) => self.pos += 2,
                (b'\'', QuoteEscape::Doubled) if bytes.get(self.pos + 1) == Some(&b'\'') => {
                    self.pos += 2;
                }
                (b'\'', _) => {
                    self.pos += 1;
                    return Ok(self.token(TokenKind::StringLiteral, start_pos));
                }
                _ => self.pos += 1,
            }
        }

        self.pos = bytes.len();
        Err(LexerError::UnterminatedString { pos: start_pos })
    }

    /// Reads a `[bracketed]` or `"quoted"` identifier; a doubled closing
    /// delimiter stands for itself.
    fn read_delimited(&mut self, start_pos: usize, close: u8) -> Result<Token, LexerError> {
        let bytes = self.input.as_bytes();
        self.pos += 1;

        let mut name = String::new();
        let mut chunk_start = self.pos;
        while self.pos < bytes.len() {
            if bytes[self.pos] == close {
                name.push_str(&self.input[chunk_start..self.pos]);
                if bytes.get(self.pos + 1) == Some(&close) {
                    name.push(close as char);
                    self.pos += 2;
                    chunk_start = self.pos;
                } else {
                    self.pos += 1;
                    return Ok(self.token(TokenKind::Identifier(name), start_pos));
                }
            } else {
                self.pos += 1;
            }
        }

        self.pos = bytes.len();
        Err(LexerError::UnterminatedIdentifier { pos: start_pos })
    }

    fn read_identifier(&mut self, start_pos: usize) -> Token {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_ident_cont(bytes[self.pos]) {
            self.pos += 1;
        }

        let ident = &self.input[start_pos..self.pos];
        let kind = if ident.eq_ignore_ascii_case("INSERT") {
            TokenKind::Insert
        } else if ident.eq_ignore_ascii_case("INTO") {
            TokenKind::Into
        } else if ident.eq_ignore_ascii_case("VALUES") {
            TokenKind::Values
        } else {
            TokenKind::Identifier(ident.into())
        };
        self.token(kind, start_pos)
    }

    /// Reads a run of characters that cannot start any other token, up to a
    /// separator or the start of a comment.
    fn read_other(&mut self, start_pos: usize) -> Token {
        let rest = &self.input[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(i, c)| {
                i > 0
                    && (c.is_ascii_whitespace()
                        || is_token_boundary(c)
                        || rest[i..].starts_with("--")
                        || rest[i..].starts_with("/*"))
            })
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        self.token(TokenKind::Other, start_pos)
    }
}

/// Check if a byte can start an identifier.
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'_' | b'@' | b'#')
}

/// Check if a byte can continue an identifier.
fn is_ident_cont(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'@' | b'#' | b'$')
}

fn is_token_boundary(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | ';' | '\'' | '[' | '"')
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// Unterminated string literal.
    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString {
        /// Position where the literal started.
        pos: usize,
    },
    /// Unterminated delimited identifier.
    #[error("Unterminated delimited identifier starting at position {pos}")]
    UnterminatedIdentifier {
        /// Position where the identifier started.
        pos: usize,
    },
}

impl LexerError {
    /// Byte offset the error points at.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Self::UnterminatedString { pos } | Self::UnterminatedIdentifier { pos } => *pos,
        }
    }
}
