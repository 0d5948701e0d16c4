//! The conversion pipeline: scan, tokenize, normalize, render.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::columns::ColumnList;
use crate::errors::{ConvertError, RowError};
use crate::normalizer::CanonicalValue;
use crate::render::{RenderOptions, SeedDeclaration};
use crate::scanner::{InsertStatement, Scanner, ValueGroup};
use crate::tokenizer::{QuoteEscape, ValueTokenizer};

/// Entity name used when neither the caller nor the script provides one.
pub const DEFAULT_ENTITY: &str = "Entity";

/// Options of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    entity: Option<String>,
    escape: QuoteEscape,
    render: RenderOptions,
    strict: bool,
}

impl ConvertOptions {
    /// Sets the type instantiated by every block. Defaults to the table name.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets how quotes are escaped inside string literals.
    #[must_use]
    pub fn with_escape(mut self, escape: QuoteEscape) -> Self {
        self.escape = escape;
        self
    }

    /// Sets the layout of the rendered declaration.
    #[must_use]
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// When enabled, the first row error aborts the conversion.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The caller-supplied entity name, if any.
    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// The escape convention of string literals.
    #[must_use]
    pub fn escape(&self) -> QuoteEscape {
        self.escape
    }

    /// The render options.
    #[must_use]
    pub fn render(&self) -> &RenderOptions {
        &self.render
    }

    /// Whether row errors are fatal.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// The outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Conversion {
    /// Table targeted by the first `INSERT`, or the entity name if it has none.
    pub table: String,
    /// Schema of the first `INSERT`'s table, if qualified.
    pub schema: Option<String>,
    /// Type instantiated by every block.
    pub entity: String,
    /// Column list of the first `INSERT`.
    pub columns: ColumnList,
    /// Normalized values of every rendered row.
    pub rows: Vec<Vec<CanonicalValue>>,
    /// Rows and statements that were skipped.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_messages"))]
    pub row_errors: Vec<RowError>,
    /// The rendered declaration.
    pub output: String,
}

impl Conversion {
    /// Returns `true` if every statement and row was rendered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.row_errors.is_empty()
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}

impl FromStr for Conversion {
    type Err = ConvertError;

    fn from_str(sql: &str) -> Result<Self, Self::Err> {
        convert(sql, &ConvertOptions::default())
    }
}

#[cfg(feature = "serde")]
fn serialize_messages<S: serde::Serializer>(
    errors: &[RowError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(alloc::string::ToString::to_string))
}

/// Converts a script of `INSERT` statements into a bulk-seed declaration.
///
/// The first `INSERT` fixes the table, the entity name (unless given in
/// `options`) and the column list shared by every row. Each value group of
/// every `INSERT` becomes one object block.
///
/// # Errors
///
/// Returns [`ConvertError`] when the column list cannot be determined from
/// the first statement, or, in strict mode, when any row fails. A first
/// statement whose column list parsed but whose values did not is reported
/// in [`Conversion::row_errors`] like any other malformed statement.
///
/// # Example
///
/// ```
/// use sql_seed_rs::{ConvertOptions, convert};
///
/// let sql = "INSERT [dbo].[Animals] ([Id],[Name]) VALUES (1, N'Cat')";
/// let conversion = convert(sql, &ConvertOptions::default()).unwrap();
///
/// assert_eq!(conversion.table, "Animals");
/// assert_eq!(
///     conversion.output,
///     "entity.HasData(\n    new Animals\n    {\n        Id = 1,\n        Name = 'Cat',\n    }\n);"
/// );
/// ```
pub fn convert(sql: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut scanner = Scanner::new(sql, options.escape);
    let (header, first) = match scanner.next().ok_or(ConvertError::NoInsertStatement)? {
        Ok(InsertStatement { header, groups }) => (header, Ok(groups)),
        Err(err) => match err.into_parts() {
            (Some(header), source) => (header, Err(source)),
            (None, source) => return Err(ConvertError::MalformedFirstStatement(source)),
        },
    };
    let columns = header
        .columns
        .clone()
        .ok_or(ConvertError::MissingColumnList { pos: header.pos })?;

    let entity = match (&options.entity, header.table()) {
        (Some(entity), _) => entity.clone(),
        (None, "") => DEFAULT_ENTITY.to_owned(),
        (None, table) => table.to_owned(),
    };
    let table = match header.table() {
        "" => entity.clone(),
        table => table.to_owned(),
    };
    tracing::debug!(
        table = %table,
        entity = %entity,
        columns = columns.len(),
        "resolved column list from first INSERT"
    );

    let mut collector = RowCollector {
        tokenizer: ValueTokenizer::new(options.escape),
        escape: options.escape,
        strict: options.strict,
        columns: &columns,
        rows: Vec::new(),
        row_errors: Vec::new(),
    };
    match first {
        Ok(groups) => collector.collect(0, &groups)?,
        Err(source) => collector.reject(RowError::Statement {
            statement: 0,
            source,
        })?,
    }
    for (i, statement) in scanner.enumerate() {
        match statement {
            Ok(statement) => collector.collect(i + 1, &statement.groups)?,
            Err(err) => collector.reject(RowError::Statement {
                statement: i + 1,
                source: err.into_cause(),
            })?,
        }
    }

    let RowCollector {
        rows, row_errors, ..
    } = collector;
    tracing::debug!(
        rows = rows.len(),
        skipped = row_errors.len(),
        "rendering seed declaration"
    );

    let output = SeedDeclaration {
        options: &options.render,
        escape: options.escape,
        entity: &entity,
        columns: &columns,
        rows: &rows,
    }
    .render();

    Ok(Conversion {
        table,
        schema: header.schema().map(str::to_owned),
        entity,
        columns,
        rows,
        row_errors,
        output,
    })
}

/// Accumulates normalized rows and the errors of rejected ones.
struct RowCollector<'c> {
    tokenizer: ValueTokenizer,
    escape: QuoteEscape,
    strict: bool,
    columns: &'c ColumnList,
    rows: Vec<Vec<CanonicalValue>>,
    row_errors: Vec<RowError>,
}

impl RowCollector<'_> {
    fn collect(
        &mut self,
        statement: usize,
        groups: &[ValueGroup<'_>],
    ) -> Result<(), ConvertError> {
        for (row, group) in groups.iter().enumerate() {
            let tokens = match self.tokenizer.tokenize(group.text) {
                Ok(tokens) => tokens,
                Err(source) => {
                    self.reject(RowError::Tokenize {
                        statement,
                        row,
                        pos: group.pos + source.pos(),
                        source,
                    })?;
                    continue;
                }
            };

            if tokens.len() != self.columns.len() {
                self.reject(RowError::Misaligned {
                    statement,
                    row,
                    pos: group.pos,
                    expected: self.columns.len(),
                    found: tokens.len(),
                })?;
                continue;
            }

            self.rows.push(
                tokens
                    .iter()
                    .map(|token| CanonicalValue::normalize(token.as_str(), self.escape))
                    .collect(),
            );
        }
        Ok(())
    }

    fn reject(&mut self, err: RowError) -> Result<(), ConvertError> {
        if self.strict {
            return Err(ConvertError::Row(err));
        }
        tracing::warn!(pos = err.pos(), "skipping row: {}", err);
        self.row_errors.push(err);
        Ok(())
    }
}
