//! Benchmark for converting generated `INSERT` scripts.
//!
//! Measures the performance of:
//! 1. Splitting single value groups into raw tokens
//! 2. Scanning whole scripts into statements
//! 3. End-to-end conversion, with both string styles

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_seed_rs::{
    CanonicalValue, ConvertOptions, QuoteEscape, RenderOptions, Scanner, StringStyle,
    ValueTokenizer, convert,
};
use std::fmt::Write;
use std::hint::black_box;

const HEADER: &str = "\
USE [Clinic]
GO
SET IDENTITY_INSERT [dbo].[Patients] ON
GO
";

/// Builds a script in the shape SSMS emits, one `INSERT` per row.
fn ssms_script(rows: usize) -> String {
    let mut sql = String::from(HEADER);
    for i in 0..rows {
        writeln!(
            sql,
            "INSERT [dbo].[Patients] ([Id], [Name], [Notes], [Weight], [AdmittedOn]) \
             VALUES ({i}, N'Patient, #{i}', N'It''s (probably) fine', {}.5, \
             CAST(N'2024-01-{:02}T00:00:00.000' AS DateTime))\nGO",
            40 + i % 60,
            1 + i % 28,
        )
        .unwrap();
    }
    sql.push_str("SET IDENTITY_INSERT [dbo].[Patients] OFF\nGO\n");
    sql
}

/// Builds a script with a single multi-row `INSERT`.
fn multi_row_script(rows: usize) -> String {
    let mut sql = String::from("INSERT INTO [dbo].[Patients] ([Id], [Name], [Notes]) VALUES ");
    for i in 0..rows {
        if i > 0 {
            sql.push_str(", ");
        }
        write!(sql, "({i}, N'Patient {i}', NULL)").unwrap();
    }
    sql.push(';');
    sql
}

fn benchmark_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let tokenizer = ValueTokenizer::new(QuoteEscape::Doubled);

    let simple = "1, N'Cat', NULL";
    let nested = "7, N'Smith, John', N'it''s (really) fine', CAST(N'2021-03-04' AS DateTime), 19.95";

    group.bench_function("simple", |b| {
        b.iter(|| black_box(tokenizer.tokenize(black_box(simple)).unwrap()));
    });
    group.bench_function("nested", |b| {
        b.iter(|| black_box(tokenizer.tokenize(black_box(nested)).unwrap()));
    });
    group.bench_function("tokenize_and_normalize", |b| {
        b.iter(|| {
            for token in tokenizer.tokenize(black_box(nested)).unwrap() {
                black_box(CanonicalValue::normalize(token.as_str(), QuoteEscape::Doubled));
            }
        });
    });

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for rows in [10, 100, 1000] {
        let sql = ssms_script(rows);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::new("ssms", rows), &sql, |b, sql| {
            b.iter(|| {
                for statement in Scanner::new(black_box(sql), QuoteEscape::Doubled) {
                    black_box(statement.unwrap());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    let csharp = ConvertOptions::default()
        .with_entity("Patient")
        .with_render(RenderOptions::default().with_string_style(StringStyle::CSharp));

    for rows in [10, 100, 1000] {
        let sql = ssms_script(rows);
        group.throughput(Throughput::Bytes(sql.len() as u64));

        group.bench_with_input(BenchmarkId::new("ssms", rows), &sql, |b, sql| {
            b.iter(|| black_box(convert(black_box(sql), &ConvertOptions::default()).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("ssms_csharp", rows), &sql, |b, sql| {
            b.iter(|| black_box(convert(black_box(sql), &csharp).unwrap()));
        });

        let sql = multi_row_script(rows);
        group.bench_with_input(BenchmarkId::new("multi_row", rows), &sql, |b, sql| {
            b.iter(|| black_box(convert(black_box(sql), &ConvertOptions::default()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_scan,
    benchmark_convert
);
criterion_main!(benches);
