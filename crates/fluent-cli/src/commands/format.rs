//! Implementation of the `ftl format` command.

use std::path::PathBuf;

use fluent::{FluentArgs, FluentLoader, Value, compute_suggestions};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Arguments for the format command.
#[derive(Debug, clap::Args)]
pub struct FormatArgs {
    /// Directory of `<locale>/*.ftl` resources
    #[arg(long)]
    pub dir: PathBuf,

    /// Locale fallback chain, most preferred first (repeatable)
    #[arg(long = "locale", required = true)]
    pub locales: Vec<String>,

    /// Message id, or `message.attribute`
    pub id: String,

    /// Arguments in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Fail on malformed resources instead of skipping entries
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for format results.
#[derive(Debug, Serialize)]
struct FormatOutput {
    result: String,
    errors: Vec<String>,
}

/// Parse a `name=value` parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((name.to_string(), value.to_string()))
}

/// Integers and decimals become numbers; anything else stays a string.
fn parse_value(raw: String) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>()
        && f.is_finite()
    {
        Value::from(f)
    } else {
        Value::from(raw)
    }
}

/// Run the format command.
pub fn run_format(args: FormatArgs, verbose: bool) -> Result<i32> {
    let mut loader = FluentLoader::builder().strict(args.strict).build();
    let warnings = loader.add_directory(&args.dir).into_diagnostic()?;
    if verbose {
        for warning in &warnings {
            eprintln!("{} {warning}", "warning:".yellow());
        }
    }

    let locales: Vec<&str> = args.locales.iter().map(String::as_str).collect();
    let params: FluentArgs = args
        .params
        .into_iter()
        .map(|(name, raw)| (name, parse_value(raw)))
        .collect();

    let formatted = match loader.format_message_with_errors(&locales, &args.id, &params) {
        Ok(Some(formatted)) => formatted,
        Ok(None) => {
            eprintln!("{} unknown message '{}'", "error:".red(), args.id);
            let base = args.id.split('.').next().unwrap_or(&args.id);
            let suggestions = compute_suggestions(base, &loader.message_ids(&locales));
            if !suggestions.is_empty() {
                eprintln!("  did you mean: {}?", suggestions.join(", "));
            }
            return Ok(exitcode::DATAERR);
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red());
            return Ok(exitcode::DATAERR);
        }
    };

    if args.json {
        let output = FormatOutput {
            result: formatted.value,
            errors: formatted.errors.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{}", formatted.value);
        for error in &formatted.errors {
            eprintln!("{} {error}", "warning:".yellow());
        }
    }
    Ok(exitcode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("expr=a=b"),
            Ok(("expr".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn values_prefer_numbers() {
        assert_eq!(parse_value("3".to_string()), Value::Integer(3));
        assert_eq!(parse_value("2.5".to_string()), Value::Float(2.5));
        assert_eq!(parse_value("Ana".to_string()), Value::from("Ana"));
        assert_eq!(parse_value("inf".to_string()), Value::from("inf"));
    }
}
