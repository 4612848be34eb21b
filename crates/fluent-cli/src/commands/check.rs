//! Implementation of the `ftl check` command.

use std::fs;
use std::path::PathBuf;

use fluent::parser::{ParseError, ParseMode, parse_bytes};
use miette::{IntoDiagnostic, Report, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::output::FtlDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.ftl)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Stop at the first malformed entry of each file
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON report for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    messages: usize,
    terms: usize,
    errors: Vec<EntryError>,
}

/// JSON form of a malformed entry.
#[derive(Debug, Serialize)]
struct EntryError {
    line: usize,
    column: usize,
    message: String,
    content: Option<String>,
}

/// Run the check command.
pub fn run_check(args: &CheckArgs, verbose: bool) -> Result<i32> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let mut reports = Vec::new();
    let mut failed = false;

    for path in &args.files {
        let bytes = fs::read(path)
            .into_diagnostic()
            .map_err(|e| miette::miette!("Cannot read {}: {e}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let mut report = FileReport {
            file: path.display().to_string(),
            messages: 0,
            terms: 0,
            errors: Vec::new(),
        };
        let mut diagnostics = Vec::new();

        match parse_bytes(&bytes, mode) {
            Ok(resource) => {
                report.messages = resource.messages().count();
                report.terms = resource.terms().count();
                for junk in resource.junk() {
                    let annotation = junk.annotations.first();
                    report.errors.push(EntryError {
                        line: annotation.map_or(0, |a| a.line),
                        column: annotation.map_or(0, |a| a.column),
                        message: annotation.map(|a| a.message.clone()).unwrap_or_default(),
                        content: Some(junk.content.clone()),
                    });
                    diagnostics.push(FtlDiagnostic::from_junk(path, &content, junk));
                }
            }
            Err(err) => {
                let (line, column) = match &err {
                    ParseError::Syntax { line, column, .. }
                    | ParseError::UnexpectedEof { line, column } => (*line, *column),
                    ParseError::InvalidUtf8 => (1, 1),
                };
                report.errors.push(EntryError {
                    line,
                    column,
                    message: err.to_string(),
                    content: None,
                });
                diagnostics.push(FtlDiagnostic::from_parse_error(path, &content, &err));
            }
        }

        failed |= !report.errors.is_empty();
        if !args.json {
            for diagnostic in diagnostics {
                eprintln!("{:?}", Report::new(diagnostic));
            }
            if report.errors.is_empty() {
                if verbose {
                    println!(
                        "{} {} ({} messages, {} terms)",
                        "ok".green(),
                        report.file,
                        report.messages,
                        report.terms
                    );
                }
            } else {
                println!(
                    "{} {} ({} malformed)",
                    "error".red(),
                    report.file,
                    report.errors.len()
                );
            }
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports).into_diagnostic()?);
    }

    Ok(if failed {
        exitcode::DATAERR
    } else {
        exitcode::OK
    })
}
