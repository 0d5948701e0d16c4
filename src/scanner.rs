//! Statement scanner for scripted `INSERT` statements.
//!
//! The scanner walks a whole script and yields one [`InsertStatement`] per
//! `INSERT` clause, skipping everything else (`SET IDENTITY_INSERT ... ON`,
//! `GO`, comments, DDL). It understands only the grammar subset scripting
//! tools emit:
//!
//! ```text
//! INSERT [INTO] name { . name } [ ( column { , column } ) ] VALUES ( ... ) { , ( ... ) } [;]
//! ```
//!
//! An `INSERT` keyword that continues another clause (`GRANT INSERT ON`,
//! `AFTER INSERT AS`, `SELECT, INSERT`, `THEN INSERT`) does not start a
//! statement.
//!
//! Value lists are not tokenized here; the raw text of each parenthesized
//! group is borrowed from the input and handed to the
//! [`ValueTokenizer`](crate::ValueTokenizer). String literals are lexed while
//! the group is captured, so an unterminated string is reported by the scanner
//! as [`ScanError::Lexer`].

mod lexer;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

pub use lexer::{Lexer, LexerError, Token, TokenKind};

use crate::columns::{ColumnList, ColumnListError};
use crate::tokenizer::QuoteEscape;

/// Words after which `INSERT` names a permission, a trigger event or a merge action.
const CLAUSE_KEYWORDS: [&str; 7] = ["GRANT", "DENY", "REVOKE", "AFTER", "FOR", "OF", "THEN"];

/// The raw text of one parenthesized value group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueGroup<'a> {
    /// Text between the opening and the matching closing parenthesis.
    pub text: &'a str,
    /// Byte offset of `text` within the scanned input.
    pub pos: usize,
}

/// Everything of an `INSERT` statement up to the `VALUES` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertHeader {
    /// Byte offset of the `INSERT` keyword.
    pub pos: usize,
    /// Parts of the target object name, delimiters removed (`[dbo].[Animals]` gives `["dbo", "Animals"]`).
    pub object_name: Vec<String>,
    /// The explicit column list, if the statement has one.
    pub columns: Option<ColumnList>,
}

impl InsertHeader {
    /// The target table, i.e. the last part of the object name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.object_name.last().map_or("", String::as_str)
    }

    /// The schema part of the object name, if qualified.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        let len = self.object_name.len();
        (len >= 2).then(|| self.object_name[len - 2].as_str())
    }
}

/// One `INSERT` statement found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement<'a> {
    /// Target and column list.
    pub header: InsertHeader,
    /// One entry per `( ... )` group after `VALUES`.
    pub groups: Vec<ValueGroup<'a>>,
}

impl InsertStatement<'_> {
    /// The target table, i.e. the last part of the object name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.header.table()
    }

    /// The schema part of the object name, if qualified.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.header.schema()
    }
}

/// Errors raised while scanning an `INSERT` statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// Unexpected token.
    #[error("Unexpected token {found:?} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: &'static str,
        /// What was found.
        found: TokenKind,
        /// Position in input.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: &'static str,
        /// Position in input (its length).
        pos: usize,
    },
    /// Missing VALUES clause in INSERT.
    #[error("Missing VALUES clause in INSERT at position {pos}")]
    MissingValues {
        /// Position of the token found instead.
        pos: usize,
    },
    /// A value list whose closing parenthesis never comes.
    #[error("Unclosed value list starting at position {pos}")]
    UnclosedValueList {
        /// Position of the opening parenthesis.
        pos: usize,
    },
    /// The column list is empty or repeats a name.
    #[error("Invalid column list at position {pos}: {source}")]
    Columns {
        /// Position of the opening parenthesis.
        pos: usize,
        /// What is wrong with the list.
        source: ColumnListError,
    },
    /// The header parsed, but what follows it did not.
    #[error("{error}")]
    Values {
        /// The successfully parsed header.
        header: Box<InsertHeader>,
        /// The failure after the header.
        error: Box<ScanError>,
    },
}

impl ScanError {
    /// Byte offset the error points at.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Self::Lexer(err) => err.pos(),
            Self::Values { error, .. } => error.pos(),
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEof { pos, .. }
            | Self::MissingValues { pos }
            | Self::UnclosedValueList { pos }
            | Self::Columns { pos, .. } => *pos,
        }
    }

    /// The header of the failed statement, if it was parsed.
    #[must_use]
    pub fn header(&self) -> Option<&InsertHeader> {
        match self {
            Self::Values { header, .. } => Some(header.as_ref()),
            _ => None,
        }
    }

    /// Splits off the header of the failed statement, if it was parsed.
    #[must_use]
    pub fn into_parts(self) -> (Option<InsertHeader>, Self) {
        match self {
            Self::Values { header, error } => (Some(*header), *error),
            other => (None, other),
        }
    }

    /// Drops the header, returning the underlying failure.
    #[must_use]
    pub fn into_cause(self) -> Self {
        self.into_parts().1
    }

    fn unexpected(expected: &'static str, token: &Token) -> Self {
        match token.kind {
            TokenKind::Eof => Self::UnexpectedEof {
                expected,
                pos: token.pos,
            },
            ref found => Self::UnexpectedToken {
                expected,
                found: found.clone(),
                pos: token.pos,
            },
        }
    }
}

/// Iterator over the `INSERT` statements of a script.
///
/// A malformed statement is yielded as an error and scanning resumes at the
/// next `INSERT` keyword.
///
/// # Example
///
/// ```
/// use sql_seed_rs::{QuoteEscape, Scanner};
///
/// let sql = "SET IDENTITY_INSERT [dbo].[Animals] ON\n\
///            INSERT [dbo].[Animals] ([Id], [Name]) VALUES (1, N'Cat')";
/// let statements: Vec<_> = Scanner::new(sql, QuoteEscape::Doubled)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].table(), "Animals");
/// assert_eq!(statements[0].schema(), Some("dbo"));
/// assert_eq!(statements[0].groups[0].text, "1, N'Cat'");
/// ```
pub struct Scanner<'a> {
    lexer: Lexer<'a>,
    /// Kind of the last token skipped outside a statement.
    previous: Option<TokenKind>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `input`.
    #[must_use]
    pub fn new(input: &'a str, escape: QuoteEscape) -> Self {
        Self {
            lexer: Lexer::new(input, escape),
            previous: None,
        }
    }

    /// Whether an `INSERT` keyword at the current position continues another clause.
    fn continues_clause(&self) -> bool {
        match &self.previous {
            Some(TokenKind::Comma) => true,
            Some(TokenKind::Identifier(word)) => CLAUSE_KEYWORDS
                .iter()
                .any(|keyword| word.eq_ignore_ascii_case(keyword)),
            _ => false,
        }
    }

    /// Parse an INSERT statement; the `INSERT` keyword at `pos` is already consumed.
    fn parse_insert(&mut self, pos: usize) -> Result<InsertStatement<'a>, ScanError> {
        let header = self.parse_header(pos)?;
        match self.parse_values() {
            Ok(groups) => Ok(InsertStatement { header, groups }),
            Err(error) => Err(ScanError::Values {
                header: Box::new(header),
                error: Box::new(error),
            }),
        }
    }

    fn parse_header(&mut self, pos: usize) -> Result<InsertHeader, ScanError> {
        if self.lexer.peek()?.kind == TokenKind::Into {
            self.lexer.next()?;
        }

        let mut object_name = vec![self.expect_identifier("table name")?];
        while self.lexer.peek()?.kind == TokenKind::Dot {
            self.lexer.next()?;
            object_name.push(self.expect_identifier("identifier after '.'")?);
        }

        // Optional column list
        let columns = if self.lexer.peek()?.kind == TokenKind::LParen {
            Some(self.parse_column_list()?)
        } else {
            None
        };

        Ok(InsertHeader {
            pos,
            object_name,
            columns,
        })
    }

    /// Parse `VALUES ( ... ) { , ( ... ) } [;]`.
    fn parse_values(&mut self) -> Result<Vec<ValueGroup<'a>>, ScanError> {
        let token = self.lexer.peek()?;
        if token.kind != TokenKind::Values {
            return Err(ScanError::MissingValues { pos: token.pos });
        }
        self.lexer.next()?;

        let mut groups = vec![self.parse_group()?];
        while self.lexer.peek()?.kind == TokenKind::Comma {
            self.lexer.next()?;
            groups.push(self.parse_group()?);
        }

        // A group not separated by a comma would otherwise be skipped as noise.
        let token = self.lexer.peek()?;
        if token.kind == TokenKind::LParen {
            return Err(ScanError::unexpected("',' between value lists", token));
        }

        // Skip optional semicolon
        if token.kind == TokenKind::Semicolon {
            self.lexer.next()?;
        }

        Ok(groups)
    }

    fn parse_column_list(&mut self) -> Result<ColumnList, ScanError> {
        let open = self.expect(&TokenKind::LParen, "'(' before the column list")?;

        let mut names = Vec::new();
        loop {
            names.push(self.expect_identifier("column name")?);
            if self.lexer.peek()?.kind != TokenKind::Comma {
                break;
            }
            self.lexer.next()?;
        }

        self.expect(&TokenKind::RParen, "')' after the column list")?;

        ColumnList::try_from(names).map_err(|source| ScanError::Columns {
            pos: open.pos,
            source,
        })
    }

    /// Capture the raw text of a `( ... )` group, balancing nested parentheses.
    fn parse_group(&mut self) -> Result<ValueGroup<'a>, ScanError> {
        let open = self.expect(&TokenKind::LParen, "'(' to open a value list")?;

        let mut depth = 1usize;
        loop {
            let token = self.lexer.next()?;
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(ValueGroup {
                            text: &self.lexer.input()[open.end..token.pos],
                            pos: open.end,
                        });
                    }
                }
                TokenKind::Eof => return Err(ScanError::UnclosedValueList { pos: open.pos }),
                _ => {}
            }
        }
    }

    /// Consume a token of the same kind as `expected`, leaving any other token in place.
    fn expect(&mut self, expected: &TokenKind, what: &'static str) -> Result<Token, ScanError> {
        let token = self.lexer.peek()?;
        if core::mem::discriminant(&token.kind) != core::mem::discriminant(expected) {
            return Err(ScanError::unexpected(what, token));
        }
        Ok(self.lexer.next()?)
    }

    /// Expect an identifier and return its name.
    fn expect_identifier(&mut self, what: &'static str) -> Result<String, ScanError> {
        let token = self.lexer.peek()?;
        let TokenKind::Identifier(name) = &token.kind else {
            return Err(ScanError::unexpected(what, token));
        };
        let name = name.clone();
        self.lexer.next()?;
        Ok(name)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<InsertStatement<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = match self.lexer.next() {
                Ok(token) => token,
                Err(err) => return Some(Err(err.into())),
            };
            match token.kind {
                TokenKind::Insert if !self.continues_clause() => {
                    self.previous = None;
                    return Some(self.parse_insert(token.pos));
                }
                TokenKind::Eof => return None,
                kind => self.previous = Some(kind),
            }
        }
    }
}
