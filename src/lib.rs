#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod columns;
mod convert;
pub mod errors;
pub mod normalizer;
pub mod render;
pub mod scanner;
pub mod tokenizer;

// Re-export main types
pub use columns::{ColumnList, ColumnListError};
pub use convert::{Conversion, ConvertOptions, DEFAULT_ENTITY, convert};
pub use normalizer::CanonicalValue;
pub use render::{RenderOptions, SeedDeclaration, StringStyle};
pub use scanner::{InsertHeader, InsertStatement, ScanError, Scanner, ValueGroup};
pub use tokenizer::{QuoteEscape, RawToken, TokenizeError, ValueTokenizer};

// Re-export errors
pub use errors::{ConvertError, RowError};
