//! Integration tests for the conversion entry point.
//!
//! These tests pin down the observable contract of [`convert`]: which rows
//! are rendered, in which order, how literals are normalized, and which
//! inputs are rejected.

use sql_seed_rs::{
    CanonicalValue, Conversion, ConvertError, ConvertOptions, QuoteEscape, RowError, ScanError,
    TokenizeError, ValueTokenizer, convert,
};
use sql_seed_rs::scanner::{LexerError, TokenKind};

// =============================================================================
// Helper functions
// =============================================================================

fn convert_default(sql: &str) -> Conversion {
    convert(sql, &ConvertOptions::default()).expect("conversion should succeed")
}

/// Extracts the `Name = value` assignment lines of every rendered block.
fn assignments(output: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line == "{" {
            current = Vec::new();
        } else if line.starts_with('}') {
            blocks.push(core::mem::take(&mut current));
        } else if line.contains(" = ") {
            current.push(line.trim_end_matches(',').to_string());
        }
    }
    blocks
}

// =============================================================================
// Basic conversion
// =============================================================================

#[test]
fn test_table_name_and_columns() {
    let conversion = convert_default("INSERT [dbo].[Animals] ([Id],[Name]) VALUES (1, N'Cat')");

    assert_eq!(conversion.table, "Animals");
    assert_eq!(conversion.schema.as_deref(), Some("dbo"));
    assert_eq!(conversion.entity, "Animals");
    assert_eq!(conversion.columns.iter().collect::<Vec<_>>(), ["Id", "Name"]);
    assert_eq!(
        conversion.rows,
        [vec![
            CanonicalValue::Literal("1".into()),
            CanonicalValue::Text("Cat".into()),
        ]]
    );
    assert_eq!(assignments(&conversion.output), [["Id = 1", "Name = 'Cat'"]]);
    assert!(conversion.is_complete());
}

#[test]
fn test_one_block_with_assignments_in_column_order() {
    let conversion = convert_default(
        "INSERT [dbo].[People] ([Id], [First], [Last], [Age], [Email]) \
         VALUES (7, N'Ada', N'Lovelace', 36, NULL)",
    );

    assert_eq!(
        assignments(&conversion.output),
        [[
            "Id = 7",
            "First = 'Ada'",
            "Last = 'Lovelace'",
            "Age = 36",
            "Email = null",
        ]]
    );
}

#[test]
fn test_two_statements_give_two_blocks() {
    let sql = "\
INSERT [dbo].[Animals] ([Id], [Name]) VALUES (1, N'Cat')
INSERT [dbo].[Animals] ([Id], [Name]) VALUES (2, N'Dog')
";
    let conversion = convert_default(sql);

    assert_eq!(
        conversion.output,
        "entity.HasData(
    new Animals
    {
        Id = 1,
        Name = 'Cat',
    },
    new Animals
    {
        Id = 2,
        Name = 'Dog',
    }
);"
    );
    assert_eq!(conversion.output.matches("},").count(), 1);
}

#[test]
fn test_entity_name_override() {
    let options = ConvertOptions::default().with_entity("Illness");
    let conversion =
        convert("INSERT [dbo].[Illnesses] ([Id]) VALUES (1)", &options).expect("converts");

    assert_eq!(conversion.table, "Illnesses");
    assert!(conversion.output.contains("    new Illness\n"));
}

// =============================================================================
// Literal handling
// =============================================================================

#[test]
fn test_comma_inside_unicode_string() {
    let tokens = ValueTokenizer::default()
        .tokenize("1, N'Smith, John'")
        .expect("tokenizes");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].as_str(), "1");
    assert_eq!(
        CanonicalValue::normalize(tokens[1].as_str(), QuoteEscape::Doubled).to_string(),
        "'Smith, John'"
    );

    let conversion =
        convert_default("INSERT [dbo].[People] ([Id], [Name]) VALUES (1, N'Smith, John')");
    assert_eq!(
        assignments(&conversion.output),
        [["Id = 1", "Name = 'Smith, John'"]]
    );
}

#[test]
fn test_null_in_any_case() {
    let conversion = convert_default("INSERT t ([A], [B], [C]) VALUES (NULL, null, Null)");
    assert_eq!(
        assignments(&conversion.output),
        [["A = null", "B = null", "C = null"]]
    );
    assert!(conversion.rows[0].iter().all(CanonicalValue::is_null));
}

#[test]
fn test_bare_literals_are_verbatim() {
    let conversion = convert_default(
        "INSERT [dbo].[Orders] ([Id], [Total], [Paid], [PlacedAt]) \
         VALUES (-3, 19.95, 1, CAST(N'2021-03-04T05:06:07.000' AS DateTime))",
    );
    assert_eq!(
        assignments(&conversion.output),
        [[
            "Id = -3",
            "Total = 19.95",
            "Paid = 1",
            "PlacedAt = CAST(N'2021-03-04T05:06:07.000' AS DateTime)",
        ]]
    );
}

#[test]
fn test_doubled_quotes_survive() {
    let conversion = convert_default("INSERT t ([Note]) VALUES (N'it''s, (really) fine')");
    assert_eq!(
        assignments(&conversion.output),
        [["Note = 'it''s, (really) fine'"]]
    );
}

#[test]
fn test_backslash_escapes() {
    let options = ConvertOptions::default().with_escape(QuoteEscape::Backslash);
    let conversion =
        convert(r"INSERT INTO t (note) VALUES ('it\'s, fine')", &options).expect("converts");
    assert_eq!(assignments(&conversion.output), [[r"note = 'it\'s, fine'"]]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_columns() {
    for sql in ["", "SELECT * FROM t", "UPDATE t SET a = 1 WHERE b = 2"] {
        let err = convert(sql, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::NoInsertStatement);
        assert!(err.to_string().starts_with("could not determine column names"));
    }
}

#[test]
fn test_first_statement_without_column_list() {
    let err = convert("INSERT INTO t VALUES (1, 2)", &ConvertOptions::default()).unwrap_err();
    assert_eq!(err, ConvertError::MissingColumnList { pos: 0 });
}

#[test]
fn test_malformed_first_statement() {
    let err = convert("INSERT INTO t (a, b VALUES (1, 2)", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MalformedFirstStatement(ScanError::UnexpectedToken { pos: 20, .. })
    ));
}

#[test]
fn test_first_statement_with_bad_values_keeps_columns() {
    let sql = "INSERT [dbo].[T] ([A]) VALUES 1\nINSERT [dbo].[T] ([A]) VALUES (2)\n";
    let conversion = convert_default(sql);

    assert_eq!(conversion.table, "T");
    assert_eq!(assignments(&conversion.output), [["A = 2"]]);
    assert!(matches!(
        conversion.row_errors[..],
        [RowError::Statement {
            statement: 0,
            source: ScanError::UnexpectedToken {
                found: TokenKind::Other,
                pos: 30,
                ..
            },
        }]
    ));
}

#[test]
fn test_first_statement_without_values_keeps_columns() {
    let sql = "INSERT t ([A]) SELECT 1\nINSERT t ([A]) VALUES (2)";
    let conversion = convert_default(sql);
    assert_eq!(assignments(&conversion.output), [["A = 2"]]);
    assert_eq!(
        conversion.row_errors,
        [RowError::Statement {
            statement: 0,
            source: ScanError::MissingValues { pos: 15 },
        }]
    );
}

#[test]
fn test_value_lists_without_comma_are_reported() {
    let conversion = convert_default("INSERT t ([A]) VALUES (1) (2)");
    assert!(conversion.rows.is_empty());
    assert_eq!(conversion.row_errors.len(), 1);
    assert_eq!(conversion.row_errors[0].pos(), 26);
}

#[test]
fn test_comments_inside_values() {
    let sql = "INSERT t ([A], [B]) VALUES (1 /* x, y */, 2), (3 -- it's\n, N'four')";
    let conversion = convert_default(sql);
    assert!(conversion.is_complete());
    assert_eq!(
        assignments(&conversion.output),
        [["A = 1", "B = 2"], ["A = 3", "B = 'four'"]]
    );
}

#[test]
fn test_misaligned_rows_are_reported() {
    let sql = "\
INSERT t ([A], [B]) VALUES (1, 2)
INSERT t ([A], [B]) VALUES (3)
INSERT t ([A], [B]) VALUES (4, 5, 6)
INSERT t ([A], [B]) VALUES (7, 8)
";
    let conversion = convert_default(sql);

    assert_eq!(assignments(&conversion.output), [["A = 1", "B = 2"], ["A = 7", "B = 8"]]);
    assert_eq!(conversion.row_errors.len(), 2);
    assert!(matches!(
        conversion.row_errors[0],
        RowError::Misaligned {
            statement: 1,
            row: 0,
            expected: 2,
            found: 1,
            ..
        }
    ));
    assert!(matches!(
        conversion.row_errors[1],
        RowError::Misaligned {
            statement: 2,
            found: 3,
            ..
        }
    ));
}

#[test]
fn test_malformed_later_statement_does_not_abort() {
    let sql = "\
INSERT t ([A]) VALUES (1)
INSERT t ([A]) SELECT 2
INSERT t ([A]) VALUES (3)
";
    let conversion = convert_default(sql);

    assert_eq!(assignments(&conversion.output), [["A = 1"], ["A = 3"]]);
    assert!(matches!(
        conversion.row_errors[..],
        [RowError::Statement {
            statement: 1,
            source: ScanError::MissingValues { .. },
        }]
    ));
}

#[test]
fn test_unterminated_string_is_reported() {
    let sql = "INSERT t ([A], [B]) VALUES (1, N'one)\n";
    let conversion = convert_default(sql);
    assert!(conversion.rows.is_empty());
    assert_eq!(conversion.columns.iter().collect::<Vec<_>>(), ["A", "B"]);
    assert_eq!(
        conversion.row_errors,
        [RowError::Statement {
            statement: 0,
            source: ScanError::Lexer(LexerError::UnterminatedString { pos: 31 }),
        }]
    );

    let sql = "INSERT t ([A], [B]) VALUES (1, N'one')\nINSERT t ([A], [B]) VALUES (2, N'two)\n";
    let conversion = convert_default(sql);
    assert_eq!(conversion.rows.len(), 1);
    assert_eq!(conversion.row_errors[0].pos(), 70);
}

#[test]
fn test_empty_value_is_reported() {
    let conversion = convert_default("INSERT t ([A], [B], [C]) VALUES (1, , 3)");
    assert!(conversion.rows.is_empty());
    assert_eq!(conversion.output, "entity.HasData(\n);");
    assert_eq!(
        conversion.row_errors,
        [RowError::Tokenize {
            statement: 0,
            row: 0,
            pos: 36,
            source: TokenizeError::EmptyValue { pos: 3 },
        }]
    );
}

#[test]
fn test_strict_mode() {
    let options = ConvertOptions::default().strict(true);
    let err = convert("INSERT t ([A]) VALUES (1), (2, 3)", &options).unwrap_err();
    assert!(err.to_string().starts_with("conversion aborted: statement 0, row 1"));
}
