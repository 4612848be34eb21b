//! Implementation of the `ftl dump` command.

use std::fs;
use std::path::PathBuf;

use fluent::json::to_json_string_pretty;
use fluent::parser::{ParseMode, parse_bytes};
use miette::{IntoDiagnostic, Result, miette};

use crate::output::FtlDiagnostic;

/// Arguments for the dump command.
#[derive(Debug, clap::Args)]
pub struct DumpArgs {
    /// File to dump (.ftl)
    pub file: PathBuf,

    /// Fail on the first malformed entry instead of dumping it as junk
    #[arg(long)]
    pub strict: bool,
}

/// Run the dump command.
pub fn run_dump(args: &DumpArgs) -> Result<i32> {
    let bytes = fs::read(&args.file)
        .into_diagnostic()
        .map_err(|e| miette!("Cannot read {}: {e}", args.file.display()))?;
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let resource = match parse_bytes(&bytes, mode) {
        Ok(resource) => resource,
        Err(err) => {
            let content = String::from_utf8_lossy(&bytes);
            return Err(FtlDiagnostic::from_parse_error(&args.file, &content, &err).into());
        }
    };

    println!("{}", to_json_string_pretty(&resource).into_diagnostic()?);
    Ok(exitcode::OK)
}
