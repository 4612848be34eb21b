//! Errors and warnings raised while loading resources.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use strsim::levenshtein;
use thiserror::Error;

/// Errors that stop a resource from loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a resource or walking a directory.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse error in strict mode, with file location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// A locale tag that is not valid BCP 47.
    #[error("invalid locale tag '{tag}'")]
    InvalidLocale { tag: String },
}

/// Non-fatal problems found while loading resources.
///
/// Loading continues past these; they are returned so callers can surface
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// An entry could not be parsed and was skipped.
    #[error("{locale}:{line}:{column}: skipped malformed entry: {message}")]
    Junk {
        locale: String,
        line: usize,
        column: usize,
        message: String,
        content: String,
    },

    /// A message identifier was defined again; the later definition wins.
    #[error("{locale}: duplicate message '{id}', later definition wins")]
    DuplicateMessage { id: String, locale: String },

    /// A term identifier was defined again; the later definition wins.
    #[error("{locale}: duplicate term '-{id}', later definition wins")]
    DuplicateTerm { id: String, locale: String },
}

/// Compute "did you mean" suggestions using Levenshtein distance.
///
/// - distance <= 1 for keys of up to 3 characters
/// - distance <= 2 for longer keys
/// - at most 3 suggestions, closest first
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &String)> = available
        .iter()
        .filter_map(|candidate| {
            let distance = levenshtein(key, candidate);
            (distance > 0 && distance <= max_distance).then_some((distance, candidate))
        })
        .collect();

    suggestions.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
