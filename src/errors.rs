//! Submodule defining the errors used across the crate.

use crate::scanner::ScanError;
use crate::tokenizer::TokenizeError;

/// Errors that abort a conversion.
///
/// Every variant means the column list could not be determined, so no row
/// can be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The input holds no `INSERT` statement.
    #[error("could not determine column names: no INSERT statement found")]
    NoInsertStatement,
    /// The first `INSERT` statement has no column list.
    #[error("could not determine column names: INSERT at position {pos} has no column list")]
    MissingColumnList {
        /// Position of the first `INSERT` keyword.
        pos: usize,
    },
    /// The target or the column list of the first `INSERT` statement cannot be parsed.
    #[error("could not determine column names: {0}")]
    MalformedFirstStatement(#[from] ScanError),
    /// A row failed while strict mode was enabled.
    #[error("conversion aborted: {0}")]
    Row(RowError),
}

/// Problems confined to one statement or row; the remaining rows are still rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A later `INSERT` statement cannot be parsed.
    #[error("statement {statement}: {source}")]
    Statement {
        /// Zero-based index of the statement among the `INSERT` statements.
        statement: usize,
        /// The parse failure.
        source: ScanError,
    },
    /// A value list cannot be tokenized.
    #[error("statement {statement}, row {row} at position {pos}: {source}")]
    Tokenize {
        /// Zero-based index of the statement.
        statement: usize,
        /// Zero-based index of the value group within the statement.
        row: usize,
        /// Position of the problem in the input.
        pos: usize,
        /// The tokenizer failure.
        source: TokenizeError,
    },
    /// The number of values differs from the number of columns.
    #[error(
        "statement {statement}, row {row} at position {pos}: expected {expected} values, found {found}"
    )]
    Misaligned {
        /// Zero-based index of the statement.
        statement: usize,
        /// Zero-based index of the value group within the statement.
        row: usize,
        /// Position of the value list in the input.
        pos: usize,
        /// Number of columns.
        expected: usize,
        /// Number of values.
        found: usize,
    },
}

impl RowError {
    /// Byte offset in the input the error points at.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Self::Statement { source, .. } => source.pos(),
            Self::Tokenize { pos, .. } | Self::Misaligned { pos, .. } => *pos,
        }
    }

    /// Zero-based index of the statement the error belongs to.
    #[must_use]
    pub fn statement(&self) -> usize {
        match self {
            Self::Statement { statement, .. }
            | Self::Tokenize { statement, .. }
            | Self::Misaligned { statement, .. } => *statement,
        }
    }
}
