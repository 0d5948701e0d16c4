//! `sql-seed` CLI - converts scripted SQL Server `INSERT` statements into an
//! Entity Framework Core `HasData` seed declaration.
//!
//! The declaration is printed to standard output. Skipped rows are logged as
//! warnings on standard error; set `RUST_LOG` or pass `--verbose` for more.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sql_seed_rs::{ConvertOptions, QuoteEscape, RenderOptions, StringStyle, convert};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sql-seed")]
#[command(version, about = "Convert SQL Server INSERT scripts into EF Core seed data", long_about = None)]
struct Args {
    /// SQL script to convert. Reads standard input when omitted.
    input: Option<PathBuf>,

    /// Write the declaration to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Type instantiated by every block (defaults to the table name)
    #[arg(short, long)]
    entity: Option<String>,

    /// Expression the seeding method is called on
    #[arg(long, default_value = "entity")]
    receiver: String,

    /// Name of the seeding method
    #[arg(long, default_value = "HasData")]
    method: String,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Text written for SQL NULL
    #[arg(long, default_value = "null")]
    null_literal: String,

    /// Write strings as C# literals ("it's") instead of SQL ones ('it''s')
    #[arg(long)]
    csharp_strings: bool,

    /// String literals escape quotes with a backslash instead of doubling them
    #[arg(long)]
    backslash_escapes: bool,

    /// Fail on the first row that cannot be converted
    #[arg(long)]
    strict: bool,

    /// Print the whole conversion as JSON
    #[arg(long)]
    json: bool,

    /// Log the resolved table, columns and row counts
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let string_style = if self.csharp_strings {
            StringStyle::CSharp
        } else {
            StringStyle::SingleQuoted
        };
        let escape = if self.backslash_escapes {
            QuoteEscape::Backslash
        } else {
            QuoteEscape::Doubled
        };

        let mut options = ConvertOptions::default()
            .with_escape(escape)
            .strict(self.strict)
            .with_render(
                RenderOptions::default()
                    .with_receiver(self.receiver.as_str())
                    .with_method(self.method.as_str())
                    .with_indent(" ".repeat(self.indent))
                    .with_null_literal(self.null_literal.as_str())
                    .with_string_style(string_style),
            );
        if let Some(entity) = &self.entity {
            options = options.with_entity(entity.as_str());
        }
        options
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut sql = String::new();
            io::stdin()
                .read_to_string(&mut sql)
                .context("failed to read standard input")?;
            Ok(sql)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}").context("failed to write standard output")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let sql = read_input(args.input.as_deref())?;
    let conversion = convert(&sql, &args.options()).context("conversion failed")?;

    if !conversion.is_complete() {
        tracing::warn!(
            "{} of the rows could not be converted and were skipped",
            conversion.row_errors.len()
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&conversion).context("failed to encode JSON")?;
        write_output(args.output.as_deref(), &json)
    } else {
        write_output(args.output.as_deref(), &conversion.output)
    }
}
