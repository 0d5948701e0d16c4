//! Literal normalization from T-SQL token syntax to the canonical seed-value form.

use alloc::string::String;
use core::fmt::{self, Display};

use crate::tokenizer::QuoteEscape;

/// A raw token after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CanonicalValue {
    /// The SQL `NULL` literal, in any case.
    Null,
    /// A string literal; holds the text between the quotes with its escapes as written.
    Text(String),
    /// Any other literal (numbers, `CAST(...)`, function calls), kept verbatim.
    Literal(String),
}

impl CanonicalValue {
    /// Normalizes a raw token.
    ///
    /// Precedence: a Unicode string `N'...'` loses its prefix, `NULL` becomes
    /// [`CanonicalValue::Null`], a quoted string stays a string, and anything
    /// else is kept verbatim without validation.
    ///
    /// # Example
    ///
    /// ```
    /// use sql_seed_rs::{CanonicalValue, QuoteEscape};
    ///
    /// let value = CanonicalValue::normalize("N'Hello'", QuoteEscape::Doubled);
    /// assert_eq!(value, CanonicalValue::Text("Hello".into()));
    /// assert_eq!(value.to_string(), "'Hello'");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str, escape: QuoteEscape) -> Self {
        let raw = raw.trim();
        let unicode = raw
            .strip_prefix(['N', 'n'])
            .and_then(|rest| quoted_content(rest, escape));
        if let Some(content) = unicode {
            return Self::Text(content.into());
        }
        if raw.eq_ignore_ascii_case("NULL") {
            return Self::Null;
        }
        if let Some(content) = quoted_content(raw, escape) {
            return Self::Text(content.into());
        }
        Self::Literal(raw.into())
    }

    /// Returns `true` for [`CanonicalValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalValue::Null => write!(f, "null"),
            CanonicalValue::Text(s) => write!(f, "'{s}'"),
            CanonicalValue::Literal(s) => write!(f, "{s}"),
        }
    }
}

/// Returns the text between the quotes when `token` is exactly one string literal.
///
/// `'a' + 'b'` starts and ends with a quote but is an expression, not a literal.
fn quoted_content(token: &str, escape: QuoteEscape) -> Option<&str> {
    let inner = token.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match (c, escape) {
            ('\\', QuoteEscape::Backslash) => {
                chars.next()?;
            }
            ('\'', QuoteEscape::Doubled) => {
                if chars.next() != Some('\'') {
                    return None;
                }
            }
            ('\'', QuoteEscape::Backslash) => return None,
            _ => {}
        }
    }
    Some(inner)
}

/// Decodes the escapes of a string literal's content into the text it denotes.
#[must_use]
pub fn unescape(content: &str, escape: QuoteEscape) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        match (c, escape) {
            ('\'', QuoteEscape::Doubled) => {
                out.push('\'');
                chars.next();
            }
            ('\\', QuoteEscape::Backslash) => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}
