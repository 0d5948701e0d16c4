//! End-to-end conversion fuzzer.
//!
//! Converts arbitrary scripts and checks that every collected row lines up
//! with the column list and that the declaration is always closed.

use honggfuzz::fuzz;
use sql_seed_rs::{ConvertOptions, QuoteEscape, RenderOptions, StringStyle, convert};

fn main() {
    let variants = [
        ConvertOptions::default(),
        ConvertOptions::default()
            .with_escape(QuoteEscape::Backslash)
            .with_render(RenderOptions::default().with_string_style(StringStyle::CSharp)),
    ];

    loop {
        fuzz!(|sql: String| {
            for options in &variants {
                let Ok(conversion) = convert(&sql, options) else {
                    continue;
                };
                for row in &conversion.rows {
                    assert_eq!(row.len(), conversion.columns.len());
                }
                assert!(conversion.output.starts_with("entity.HasData(\n"));
                assert!(conversion.output.ends_with(");"));
            }
        });
    }
}
