//! Implementation of the `ftl coverage` command.

use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use fluent::parser::{ParseMode, Resource, parse};
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;

use crate::output::FtlDiagnostic;
use crate::output::table::{LocaleCoverage, format_coverage_table};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Source resource, e.g. `locales/en/main.ftl`.
    #[arg(long)]
    pub source: PathBuf,

    /// Locales to check coverage for (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// Directory holding one subdirectory per locale. Defaults to the parent
    /// of the source file's locale directory.
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Exit with non-zero code if any translation is incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    locale: String,
    translated: usize,
    total: usize,
    missing: Vec<String>,
}

fn load(path: &Path) -> Result<Resource> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {e}", path.display()))?;
    parse(&content, ParseMode::Lenient)
        .map_err(|err| FtlDiagnostic::from_parse_error(path, &content, &err).into())
}

fn message_ids(resource: &Resource) -> BTreeSet<String> {
    resource
        .messages()
        .map(|message| message.id.clone())
        .collect()
}

/// Run the coverage command.
pub fn run_coverage(args: &CoverageArgs) -> Result<i32> {
    let source_ids = message_ids(&load(&args.source)?);
    let source_count = source_ids.len();

    let file_name = args
        .source
        .file_name()
        .ok_or_else(|| miette!("{} is not a file", args.source.display()))?;
    let base_dir = args
        .translations
        .clone()
        .or_else(|| {
            args.source
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let mut coverage = Vec::new();
    for locale in &args.lang {
        let path = base_dir.join(locale).join(file_name);
        let translated_ids = if path.exists() {
            message_ids(&load(&path)?)
        } else {
            BTreeSet::new()
        };

        coverage.push(LocaleCoverage {
            locale: locale.clone(),
            translated: source_ids.intersection(&translated_ids).count(),
            missing: source_ids.difference(&translated_ids).cloned().collect(),
        });
    }

    let any_incomplete = coverage.iter().any(|entry| !entry.missing.is_empty());

    if args.json {
        let json: Vec<CoverageJson> = coverage
            .iter()
            .map(|entry| CoverageJson {
                locale: entry.locale.clone(),
                translated: entry.translated,
                total: source_count,
                missing: entry.missing.clone(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    } else {
        println!("{}", format_coverage_table(source_count, &coverage));
        for entry in coverage.iter().filter(|entry| !entry.missing.is_empty()) {
            println!("\nMissing in {}:", entry.locale);
            for id in &entry.missing {
                println!("  - {id}");
            }
        }
    }

    Ok(if args.strict && any_incomplete {
        exitcode::DATAERR
    } else {
        exitcode::OK
    })
}
