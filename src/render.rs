//! Rendering of normalized rows as an ORM bulk-seed declaration.
//!
//! The default output targets Entity Framework Core's `HasData`:
//!
//! ```text
//! entity.HasData(
//!     new Animals
//!     {
//!         Id = 1,
//!         Name = 'Cat',
//!     }
//! );
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Display, Write};

use crate::columns::ColumnList;
use crate::normalizer::{CanonicalValue, unescape};
use crate::tokenizer::QuoteEscape;

/// How string values are written in the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringStyle {
    /// Canonical single-quoted form, escapes kept as in the source (`'it''s'`).
    #[default]
    SingleQuoted,
    /// C# regular string literal with the source escapes decoded (`"it's"`).
    CSharp,
}

/// Layout and literal options of the rendered declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    receiver: String,
    method: String,
    indent: String,
    null_literal: String,
    string_style: StringStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            receiver: "entity".into(),
            method: "HasData".into(),
            indent: "    ".into(),
            null_literal: "null".into(),
            string_style: StringStyle::SingleQuoted,
        }
    }
}

impl RenderOptions {
    /// Sets the expression the seed method is called on (default `entity`).
    #[must_use]
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    /// Sets the seed method name (default `HasData`).
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets one level of indentation (default four spaces).
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the literal written for SQL `NULL` (default `null`).
    #[must_use]
    pub fn with_null_literal(mut self, null_literal: impl Into<String>) -> Self {
        self.null_literal = null_literal.into();
        self
    }

    /// Sets how string values are written.
    #[must_use]
    pub fn with_string_style(mut self, string_style: StringStyle) -> Self {
        self.string_style = string_style;
        self
    }

    /// The expression the seed method is called on.
    #[must_use]
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// The seed method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// How string values are written.
    #[must_use]
    pub fn string_style(&self) -> StringStyle {
        self.string_style
    }
}

/// A bulk-seed declaration ready to be displayed.
pub struct SeedDeclaration<'a> {
    /// Layout options.
    pub options: &'a RenderOptions,
    /// Escape convention of the string values.
    pub escape: QuoteEscape,
    /// The type instantiated by every block.
    pub entity: &'a str,
    /// Property names, in value order.
    pub columns: &'a ColumnList,
    /// One entry per object block.
    pub rows: &'a [Vec<CanonicalValue>],
}

impl SeedDeclaration<'_> {
    /// Renders the declaration into a new string.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_value(&self, f: &mut fmt::Formatter<'_>, value: &CanonicalValue) -> fmt::Result {
        match (value, self.options.string_style) {
            (CanonicalValue::Null, _) => f.write_str(&self.options.null_literal),
            (CanonicalValue::Text(content), StringStyle::CSharp) => {
                write_csharp_string(f, &unescape(content, self.escape))
            }
            (value, _) => write!(f, "{value}"),
        }
    }
}

impl Display for SeedDeclaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = &self.options.indent;
        writeln!(f, "{}.{}(", self.options.receiver, self.options.method)?;

        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "{indent}new {}", self.entity)?;
            writeln!(f, "{indent}{{")?;
            for (column, value) in self.columns.iter().zip(row) {
                write!(f, "{indent}{indent}{column} = ")?;
                self.write_value(f, value)?;
                f.write_str(",\n")?;
            }
            let separator = if i + 1 < self.rows.len() { "," } else { "" };
            writeln!(f, "{indent}}}{separator}")?;
        }

        f.write_str(");")
    }
}

/// Writes `text` as a C# regular string literal.
fn write_csharp_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c if c.is_control() => write!(f, "\\u{:04X}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
